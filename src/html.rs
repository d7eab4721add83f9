//! The dashboard page, bundled into the binary.
//!
//! The page holds no state of its own beyond the URL query string: every
//! interaction rewrites the query and asks `/api/view` for a fresh view.

pub const DASHBOARD_HTML: &str = r##"<!doctype html>
<html lang="ne">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Land Record Search System</title>
<style>
  :root { --bg:#ffffff; --fg:#1f2328; --panel:#f3f4f6; --border:#d0d7de; --accent:#d1495b; --warn:#fff4e5; --info:#e8f1fb; --err:#fde8e8; }
  body.dark { --bg:#0e1117; --fg:#e6edf3; --panel:#161b22; --border:#30363d; --accent:#ff6b81; --warn:#3a2a12; --info:#132238; --err:#3b1416; }
  * { box-sizing:border-box; }
  body { margin:0; font-family:system-ui, "Noto Sans Devanagari", sans-serif; background:var(--bg); color:var(--fg); display:flex; min-height:100vh; }
  aside { width:300px; padding:1rem; background:var(--panel); border-right:1px solid var(--border); }
  main { flex:1; padding:1.5rem; overflow:auto; }
  label { display:block; margin:.8rem 0 .25rem; font-weight:600; }
  input, select, button { width:100%; padding:.45rem; border:1px solid var(--border); border-radius:6px; background:var(--bg); color:var(--fg); font:inherit; }
  button.primary { background:var(--accent); color:#fff; border:none; cursor:pointer; margin-top:.5rem; }
  hr { border:none; border-top:1px solid var(--border); margin:1rem 0; }
  table { border-collapse:collapse; width:100%; font-size:.9rem; }
  th, td { border:1px solid var(--border); padding:.35rem .5rem; text-align:left; }
  th { background:var(--panel); position:sticky; top:0; }
  .note { padding:.6rem .8rem; border-radius:6px; margin:.6rem 0; }
  .warn { background:var(--warn); } .info { background:var(--info); } .err { background:var(--err); }
  .muted { opacity:.7; font-size:.85rem; }
  a.export { color:var(--accent); }
</style>
</head>
<body>
<aside>
  <h3 id="sidebar-title"></h3>
  <label id="lang-label" for="lang"></label>
  <select id="lang"><option value="ne">नेपाली</option><option value="en">English</option></select>
  <label id="theme-label" for="theme"></label>
  <select id="theme"><option value="light"></option><option value="dark"></option></select>
  <button id="refresh" class="primary"></button>
  <hr>
  <div id="filters"></div>
</aside>
<main>
  <h1 id="title"></h1>
  <div id="error" class="note err" hidden></div>
  <div id="status" class="muted"></div>
  <p><strong id="count"></strong> <a id="export" class="export" href="#"></a></p>
  <div id="table"></div>
  <div id="missing" class="note warn" hidden></div>
  <div id="available" class="note info" hidden></div>
</main>
<script>
const KEYS = ["plot", "vdc", "ward"];

function params() { return new URLSearchParams(window.location.search); }

function setParam(key, value) {
  const p = params();
  if (value) { p.set(key, value); } else { p.delete(key); }
  history.replaceState(null, "", "?" + p.toString());
  load();
}

async function load(method) {
  const query = params().toString();
  const url = (method === "POST" ? "/api/refresh?" : "/api/view?") + query;
  const resp = await fetch(url, { method: method || "GET" });
  const view = await resp.json().catch(() => null);
  if (!view || !view.text) {
    document.getElementById("error").hidden = false;
    text("error", resp.status + " " + resp.statusText);
    return;
  }
  draw(view);
}

function text(id, value) { document.getElementById(id).textContent = value || ""; }

function draw(view) {
  const t = view.text;
  document.title = t.page_title;
  document.documentElement.lang = view.locale;
  document.body.classList.toggle("dark", view.theme === "dark");
  text("title", t.page_title);
  text("sidebar-title", t.sidebar_title);
  text("lang-label", t.language);
  text("theme-label", t.theme);
  text("refresh", t.refresh);
  document.getElementById("lang").value = view.locale;
  const theme = document.getElementById("theme");
  theme.options[0].textContent = t.light;
  theme.options[1].textContent = t.dark;
  theme.value = view.theme;

  const err = document.getElementById("error");
  err.hidden = !view.error;
  text("error", view.error ? view.error.message : "");
  text("status", view.loaded_at ? t.loaded + " " + t.loaded_at + ": " + new Date(view.loaded_at).toLocaleString() : "");
  text("count", view.count_header);

  const exp = document.getElementById("export");
  exp.textContent = view.error ? "" : t.export_csv;
  exp.href = "/api/export.csv?" + params().toString();

  drawFilters(view);
  drawTable(view);

  const missing = document.getElementById("missing");
  const available = document.getElementById("available");
  missing.hidden = available.hidden = !view.diagnostics;
  if (view.diagnostics) {
    missing.textContent = t.missing_columns + ": " + view.diagnostics.missing.join(", ");
    available.textContent = t.available_columns + ": " + view.diagnostics.available.join(", ");
  }
}

function drawFilters(view) {
  const root = document.getElementById("filters");
  root.replaceChildren();
  for (const c of view.controls) {
    const label = document.createElement("label");
    label.textContent = c.label;
    label.htmlFor = "f-" + c.key;
    const input = document.createElement("input");
    input.id = "f-" + c.key;
    input.placeholder = c.placeholder;
    input.value = c.selected || "";
    input.setAttribute("list", "l-" + c.key);
    input.addEventListener("change", () => {
      const v = input.value;
      if (v === "" || c.options.includes(v)) { setParam(c.key, v); }
    });
    const list = document.createElement("datalist");
    list.id = "l-" + c.key;
    for (const o of c.options) {
      const opt = document.createElement("option");
      opt.value = o;
      list.appendChild(opt);
    }
    root.append(label, input, list);
  }
  const p = params();
  for (const k of KEYS) {
    const applied = k === "vdc" ? view.applied.village_unit : view.applied[k];
    if (!view.error && p.has(k) && !applied) { p.delete(k); history.replaceState(null, "", "?" + p.toString()); }
  }
}

function drawTable(view) {
  const root = document.getElementById("table");
  root.replaceChildren();
  if (view.error) { return; }
  const table = document.createElement("table");
  const head = table.createTHead().insertRow();
  for (const c of view.columns) {
    const th = document.createElement("th");
    th.textContent = c;
    head.appendChild(th);
  }
  const body = table.createTBody();
  for (const r of view.rows) {
    const tr = body.insertRow();
    for (const cell of r) { tr.insertCell().textContent = cell === null ? "" : cell; }
  }
  root.appendChild(table);
}

document.getElementById("lang").addEventListener("change", e => setParam("lang", e.target.value));
document.getElementById("theme").addEventListener("change", e => setParam("theme", e.target.value));
document.getElementById("refresh").addEventListener("click", () => load("POST"));
load();
</script>
</body>
</html>
"##;
