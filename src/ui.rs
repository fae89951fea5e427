use crate::plan::{plan, Plan};
use chrono::NaiveDate;
use serde::Serialize;

/// Data the page needs before its first request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Bootstrap<'a> {
    base_path: &'a str,
    today: NaiveDate,
    plan: &'static Plan,
}

pub fn render_index(base_path: &str, today: NaiveDate) -> String {
    let bootstrap = Bootstrap {
        base_path,
        today,
        plan: plan(),
    };
    let json = serde_json::to_string(&bootstrap)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    INDEX_HTML
        .replace("{{TITLE}}", plan().title)
        .replace("{{BOOTSTRAP}}", &json)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #12151c;
      --panel: #1b2030;
      --ink: #e9edf5;
      --muted: #8a93a8;
      --accent: #72e4d1;
      --accent-2: #5b8cff;
      --danger: #ff6b6b;
      --radius: 18px;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top left, #1f2a44, transparent 55%), var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 28px 18px 48px;
    }

    .hero { display: grid; gap: 6px; margin: 0 auto 24px; max-width: 1180px; }
    .eyebrow { color: var(--accent); text-transform: uppercase; letter-spacing: 0.14em; font-size: 0.8rem; margin: 0; }
    h1 { margin: 0; font-size: clamp(1.9rem, 4vw, 2.6rem); }
    .subtitle { margin: 0; color: var(--muted); }
    .hero-meta { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 8px; }
    .hero-meta span, .date-chip {
      background: rgba(114, 228, 209, 0.12);
      color: var(--accent);
      border-radius: 999px;
      padding: 4px 12px;
      font-size: 0.85rem;
    }

    .grid {
      max-width: 1180px;
      margin: 0 auto;
      display: grid;
      gap: 18px;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
    }

    .panel { background: var(--panel); border-radius: var(--radius); padding: 20px; display: grid; gap: 14px; align-content: start; }
    .panel-header { display: flex; justify-content: space-between; align-items: center; gap: 12px; }
    .panel-header h2 { margin: 0; font-size: 1.2rem; }

    button {
      border: none;
      border-radius: 999px;
      background: var(--accent-2);
      color: white;
      font-weight: 600;
      padding: 8px 16px;
      cursor: pointer;
    }
    button:disabled { opacity: 0.6; cursor: progress; }

    .calendar { display: grid; gap: 6px; }
    .calendar-row { display: grid; grid-template-columns: repeat(7, 1fr); gap: 6px; }
    .calendar-row.header span { text-align: center; color: var(--muted); font-size: 0.8rem; }
    .calendar-cell { background: rgba(255, 255, 255, 0.04); border-radius: 10px; padding: 10px 0; color: var(--ink); font-weight: 500; }
    .calendar-cell.muted { opacity: 0.35; }
    .calendar-cell.today { outline: 1px solid var(--accent); }
    .calendar-cell.selected { background: var(--accent-2); }
    .calendar-cell.has-log { box-shadow: inset 0 -3px 0 var(--accent); }

    .block { border-top: 1px solid rgba(255, 255, 255, 0.06); padding-top: 10px; }
    .block-title { display: flex; justify-content: space-between; gap: 8px; color: var(--muted); }
    .block h4, .warmup h4 { margin: 0 0 6px; color: var(--ink); }
    ul { margin: 0; padding-left: 18px; display: grid; gap: 4px; }
    .block li { display: flex; justify-content: space-between; gap: 12px; }

    label { color: var(--muted); font-size: 0.9rem; }
    input, textarea {
      width: 100%;
      background: rgba(255, 255, 255, 0.06);
      border: 1px solid rgba(255, 255, 255, 0.1);
      border-radius: 10px;
      color: var(--ink);
      padding: 8px 10px;
      font: inherit;
    }
    .field-group { display: grid; gap: 6px; }
    .helper { margin: 0; color: var(--muted); font-size: 0.8rem; }
    .exercise-card { background: rgba(255, 255, 255, 0.03); border-radius: 12px; padding: 12px; display: grid; gap: 8px; }
    .exercise-card h4 { margin: 0; }
    .set-row { display: grid; grid-template-columns: 60px 1fr 1fr; gap: 8px; align-items: center; }
    .checkbox { display: flex; gap: 8px; align-items: center; }
    .checkbox input { width: auto; }

    .error-banner { background: rgba(255, 107, 107, 0.15); color: var(--danger); border-radius: 10px; padding: 10px 12px; }
    .chart svg { width: 100%; height: auto; }
    .chart-meta { display: flex; justify-content: space-between; color: var(--muted); font-size: 0.85rem; }
    .chart-empty { color: var(--muted); }
    .reminder-grid { display: grid; gap: 12px; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); }
    .reminder-card { background: rgba(255, 255, 255, 0.03); border-radius: 12px; padding: 12px; }
    .reminder-card h4 { margin: 0 0 6px; }
    .wide { grid-column: 1 / -1; }
  </style>
</head>
<body>
  <header class="hero" id="hero"></header>
  <main class="grid">
    <section class="panel">
      <div class="panel-header">
        <h2>Calendar</h2>
        <div class="month-controls">
          <button type="button" id="prev-month">&#9664;</button>
          <span id="month-label"></span>
          <button type="button" id="next-month">&#9654;</button>
        </div>
      </div>
      <div class="calendar" id="calendar"></div>
    </section>

    <section class="panel">
      <div class="panel-header">
        <h2>Today&rsquo;s Focus</h2>
        <span class="date-chip" id="focus-date"></span>
      </div>
      <div id="focus"></div>
    </section>

    <section class="panel">
      <div class="panel-header">
        <h2>Daily Tracking</h2>
        <button type="button" id="save">Save</button>
      </div>
      <div class="error-banner" id="banner" hidden></div>
      <div id="tracker"></div>
    </section>

    <section class="panel">
      <div class="panel-header">
        <h2>Weight Progress</h2>
        <span class="date-chip" id="weight-count">0 entries</span>
      </div>
      <div id="chart"></div>
    </section>

    <section class="panel wide">
      <div class="panel-header">
        <h2>Lifestyle Reminders</h2>
      </div>
      <div class="reminder-grid" id="reminders"></div>
    </section>
  </main>

  <script type="application/json" id="bootstrap">{{BOOTSTRAP}}</script>
  <script>
    const boot = JSON.parse(document.getElementById("bootstrap").textContent);
    const plan = boot.plan;
    const apiBase = `${boot.basePath}/api`;

    // The tracker state lives in `session` and only changes through the server's
    // reducer; this page runs its commands and renders the result.
    let session = null;
    let view = null;
    let steps = Promise.resolve();
    let trackerKey = null;

    async function api(path, options = {}) {
      const res = await fetch(`${apiBase}${path}`, {
        headers: { "Content-Type": "application/json" },
        ...options
      });
      if (!res.ok) {
        throw new Error(`Request failed: ${res.status}`);
      }
      return res.json();
    }

    function parseDate(iso) {
      const [y, m, d] = iso.split("-").map(Number);
      return new Date(y, m - 1, d);
    }

    function setBanner(message) {
      const banner = document.getElementById("banner");
      banner.textContent = message;
      banner.hidden = !message;
    }

    // Steps run one at a time so each event sees the session the previous one produced.
    function dispatch(event) {
      steps = steps
        .then(async () => {
          if (!session) return;
          apply(await api("/session/events", { method: "POST", body: JSON.stringify({ session, event }) }));
        })
        .catch((err) => {
          console.error(err);
          setBanner("Unable to reach the server. Start the API server to load saved data.");
        });
    }

    function apply(step) {
      session = step.session;
      view = step.view;
      render();
      step.commands.forEach(run);
    }

    function settle(request, onOk, onErr) {
      request.then(onOk, (err) => {
        console.error(err);
        dispatch(onErr(String(err)));
      }).then((event) => event && dispatch(event));
    }

    function run(command) {
      switch (command.type) {
        case "fetchLogs":
          settle(api("/logs"), (data) => ({ type: "logsLoaded", logs: data.logs || {} }), (error) => ({ type: "logsFailed", error }));
          break;
        case "fetchWeights":
          settle(api("/weights"), (data) => ({ type: "weightsLoaded", weights: data.weights || [] }), (error) => ({ type: "weightsFailed", error }));
          break;
        case "fetchEntry":
          settle(
            api(`/logs/${command.date}`),
            (data) => ({ type: "entryLoaded", token: command.token, entry: data.entry ?? null }),
            (error) => ({ type: "entryFailed", token: command.token, error })
          );
          break;
        case "saveEntry":
          settle(
            api(`/logs/${command.date}`, { method: "PUT", body: JSON.stringify(command.entry) }),
            () => ({ type: "saveSucceeded", token: command.token }),
            (error) => ({ type: "saveFailed", token: command.token, error })
          );
          break;
        default:
          console.warn("unknown command", command);
      }
    }

    function edit(change) {
      dispatch({ type: "edit", edit: change });
    }

    function render() {
      setBanner(session.banner || "");
      renderCalendar();
      renderFocus();
      // Inputs are rebuilt only when a different form arrives, so edits in flight keep focus.
      const key = session.entryPhase.phase === "loading" ? `loading:${session.selected}` : `form:${session.form.date}:${session.entryPhase.phase === "saving" ? "editable" : session.entryPhase.phase}`;
      if (key !== trackerKey) {
        trackerKey = key;
        renderTracker();
      }
      renderSaveButton();
      renderChart();
    }

    function el(tag, attrs = {}, children = []) {
      const node = document.createElement(tag);
      Object.entries(attrs).forEach(([key, value]) => {
        if (key === "class") node.className = value;
        else if (key === "text") node.textContent = value;
        else if (key.startsWith("on")) node.addEventListener(key.slice(2), value);
        else if (value !== false && value !== null && value !== undefined) node.setAttribute(key, value);
      });
      children.forEach((child) => child && node.appendChild(child));
      return node;
    }

    function list(items) {
      return el("ul", {}, items.map((item) => el("li", { text: item })));
    }

    function renderHero() {
      const hero = document.getElementById("hero");
      hero.replaceChildren(
        el("p", { class: "eyebrow", text: plan.phase.name }),
        el("h1", { text: plan.title }),
        el("p", { class: "subtitle", text: plan.phase.goal }),
        el("div", { class: "hero-meta" }, [plan.schedule, plan.equipment, plan.diet].map((t) => el("span", { text: t })))
      );
    }

    function renderCalendar() {
      const cursor = parseDate(session.month);
      document.getElementById("month-label").textContent = cursor.toLocaleDateString(undefined, {
        month: "long",
        year: "numeric"
      });
      const rows = [el("div", { class: "calendar-row header" }, plan.weekdayLabels.map((d) => el("span", { text: d })))];
      view.calendar.forEach((week) => {
        rows.push(
          el(
            "div",
            { class: "calendar-row" },
            week.map((cell) => {
              const classes = ["calendar-cell"];
              if (!cell.inMonth) classes.push("muted");
              if (cell.isToday) classes.push("today");
              if (cell.isSelected) classes.push("selected");
              if (cell.hasLog) classes.push("has-log");
              return el("button", {
                type: "button",
                class: classes.join(" "),
                text: String(parseDate(cell.date).getDate()),
                onclick: () => dispatch({ type: "selectDate", date: cell.date })
              });
            })
          )
        );
      });
      document.getElementById("calendar").replaceChildren(...rows);
    }

    function renderFocus() {
      document.getElementById("focus-date").textContent = parseDate(session.selected).toLocaleDateString(undefined, {
        weekday: "long",
        year: "numeric",
        month: "long",
        day: "numeric"
      });
      const focus = document.getElementById("focus");
      const workout = view.workout;
      if (workout) {
        focus.replaceChildren(
          el("h3", { text: workout.name }),
          el("div", { class: "warmup" }, [el("h4", { text: "Warm-up" }), list(plan.warmup)]),
          ...workout.blocks.map((block) =>
            el("div", { class: "block" }, [
              el("div", { class: "block-title" }, [el("h4", { text: block.title }), block.note ? el("span", { text: block.note }) : null]),
              el(
                "ul",
                {},
                block.exercises.map((exercise) =>
                  el("li", {}, [el("span", { text: exercise.name }), el("span", { text: `${exercise.sets} x ${exercise.reps}` })])
                )
              )
            ])
          ),
          el("p", { class: "helper", text: `Post-lift cardio: ${plan.postLiftCardio}` })
        );
      } else if (view.assignment.type === "cardio") {
        focus.replaceChildren(el("h3", { text: "Cardio & Recovery" }), list(plan.cardioStrategy));
      } else {
        focus.replaceChildren(
          el("h3", { text: "Recovery Day" }),
          el("p", { text: "Focus on steps, hydration, and mobility. Keep the streak alive." })
        );
      }
    }

    function renderSaveButton() {
      const button = document.getElementById("save");
      const phase = session ? session.entryPhase.phase : "loading";
      button.disabled = phase !== "editable";
      button.textContent = phase === "saving" ? "Saving…" : "Save";
    }

    function field(label, input) {
      return el("div", { class: "field-group" }, [el("label", { text: label }), input]);
    }

    function isChecked(value) {
      return value === true || value === "true";
    }

    function renderTracker() {
      const tracker = document.getElementById("tracker");
      if (!session || session.entryPhase.phase === "loading") {
        tracker.replaceChildren(el("p", { class: "helper", text: "Loading…" }));
        return;
      }
      const form = session.form;
      const nodes = [
        field(
          "Body weight (lbs)",
          el("input", {
            type: "number",
            inputmode: "decimal",
            placeholder: "Log today’s weight",
            value: form.weight ?? "",
            onchange: (e) => edit({ field: "weight", value: e.target.value })
          })
        )
      ];

      if (view.workout) {
        Object.entries(form.workouts || {}).forEach(([exercise, sets]) => {
          nodes.push(
            el("div", { class: "exercise-card" }, [
              el("h4", { text: exercise }),
              ...sets.map((set, index) =>
                el("div", { class: "set-row" }, [
                  el("span", { text: `Set ${set.set}` }),
                  el("input", {
                    type: "number",
                    placeholder: "Reps",
                    value: set.reps ?? "",
                    onchange: (e) => edit({ field: "setReps", exercise, index, value: e.target.value })
                  }),
                  el("input", {
                    type: "number",
                    placeholder: "Weight",
                    value: set.weight ?? "",
                    onchange: (e) => edit({ field: "setWeight", exercise, index, value: e.target.value })
                  })
                ])
              )
            ])
          );
        });
      } else {
        const cardio = form.cardio;
        const recovery = el("textarea", {
          rows: "3",
          placeholder: "Walked before work, mobility, etc.",
          onchange: (e) => edit({ field: "cardioNotes", value: e.target.value })
        });
        recovery.value = cardio.notes ?? "";
        nodes.push(
          el("label", { class: "checkbox" }, [
            el("input", {
              type: "checkbox",
              checked: isChecked(cardio.completed) ? "checked" : false,
              onchange: (e) => edit({ field: "cardioCompleted", value: e.target.checked })
            }),
            el("span", { text: "Cardio done" })
          ]),
          field("Steps", el("input", {
            type: "number",
            placeholder: "8,000+",
            value: cardio.steps ?? "",
            onchange: (e) => edit({ field: "cardioSteps", value: e.target.value })
          })),
          field("Recovery notes", recovery)
        );
      }

      const notes = el("textarea", {
        rows: "3",
        placeholder: "Energy, sleep, digestion, stress.",
        onchange: (e) => edit({ field: "notes", value: e.target.value })
      });
      notes.value = form.notes ?? "";
      nodes.push(field("General notes", notes));
      tracker.replaceChildren(...nodes);
    }

    function renderChart() {
      const data = (session ? session.weights : []).filter((p) => p.weight !== null && p.weight !== "" && !Number.isNaN(Number(p.weight)));
      document.getElementById("weight-count").textContent = `${(session ? session.weights : []).length} entries`;
      const chart = document.getElementById("chart");
      if (data.length === 0) {
        chart.replaceChildren(el("div", { class: "chart-empty", text: "No weight entries yet. Log today to start the graph." }));
        return;
      }
      const values = data.map((p) => Number(p.weight));
      const min = Math.min(...values);
      const max = Math.max(...values);
      const width = 480;
      const height = 180;
      const padding = 10;
      const range = max - min || 1;
      const points = values.map((value, idx) => {
        const x = (idx / (values.length - 1 || 1)) * (width - padding * 2) + padding;
        const y = height - padding - ((value - min) / range) * (height - padding * 2);
        return [x, y];
      });
      const dots = points.map(([x, y]) => `<circle cx="${x}" cy="${y}" r="4" fill="#72e4d1" />`).join("");
      chart.innerHTML = `
        <div class="chart">
          <svg viewBox="0 0 ${width} ${height}" aria-label="Weight progress chart">
            <defs>
              <linearGradient id="line" x1="0" y1="0" x2="1" y2="0">
                <stop offset="0%" stop-color="#72e4d1" />
                <stop offset="100%" stop-color="#5b8cff" />
              </linearGradient>
            </defs>
            <polyline points="${points.map((p) => p.join(",")).join(" ")}" fill="none" stroke="url(#line)" stroke-width="3" />
            ${dots}
          </svg>
          <div class="chart-meta"><span>Low: ${min.toFixed(1)} lbs</span><span>High: ${max.toFixed(1)} lbs</span></div>
        </div>`;
    }

    function renderReminders() {
      const cards = [
        ["Cardio Strategy", plan.cardioStrategy],
        ["Nutrition Targets", plan.nutrition.targets],
        ["Batch Prep", plan.nutrition.batchPrep],
        ["Daily Meal Flow", plan.nutrition.dailyMeals],
        ["Progression Rules", plan.progression],
        ["Troubleshooting", plan.troubleshooting]
      ];
      document.getElementById("reminders").replaceChildren(
        ...cards.map(([title, items]) => el("div", { class: "reminder-card" }, [el("h4", { text: title }), list(items)]))
      );
    }

    document.getElementById("prev-month").addEventListener("click", () => dispatch({ type: "previousMonth" }));
    document.getElementById("next-month").addEventListener("click", () => dispatch({ type: "nextMonth" }));
    document.getElementById("save").addEventListener("click", () => dispatch({ type: "save" }));

    document.getElementById("focus-date").textContent = parseDate(boot.today).toLocaleDateString();
    renderHero();
    renderReminders();
    renderTracker();
    renderSaveButton();
    api("/session")
      .then(apply)
      .catch((err) => {
        console.error(err);
        setBanner("Unable to reach the server. Start the API server to load saved data.");
      });
  </script>
</body>
</html>
"##;
