use crate::model::GraphView;

/// Render a self-contained HTML page (view model embedded as JSON).
///
/// The template is filled with `replace` rather than `format!()`: the JS
/// template literals (`${x}`) would clash with Rust format braces.
pub fn render_html(view: &GraphView) -> anyhow::Result<String> {
    // `</` would close the script element early.
    let json = serde_json::to_string(view)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Program graph</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .container { display: flex; height: calc(100vh - 58px); }
  .sidebar { width: 320px; border-right: 1px solid #ddd; padding: 12px; overflow: auto; }
  .main { flex: 1; padding: 12px; overflow: auto; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }

  .program { cursor: pointer; user-select: none; padding: 2px 4px; border-radius: 4px; }
  .program:hover { background: #f3f3f3; }
  .program.selected { background: #e9f2ff; border: 1px solid #cfe3ff; }
  .program.root { font-weight: bold; }
  .muted { color: #777; font-size: 12px; }
  .param { display: inline-block; padding: 1px 6px; margin: 1px; border-radius: 4px; background: #f1f1f1; }
  .param.inherited { background: #fff4d6; }

  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; vertical-align: top; }
  th { background: white; border-bottom: 1px solid #ddd; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="sidebar">
    <input id="search" placeholder="Search program or parameter..." style="width: 100%; box-sizing: border-box; padding: 6px 8px; margin-bottom: 8px; border: 1px solid #ddd; border-radius: 6px;">
    <div id="list"></div>
  </div>

  <div class="main">
    <h2 id="title">Select a program</h2>
    <table id="details" style="display:none;"><tbody id="detailsBody"></tbody></table>
  </div>
</div>

<script>
// Embedded graph data (JSON object literal)
const DATA = __DATA__;

const state = {
  selected: null,
  search: ""
};

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function params(list, cls) {
  if (!list || list.length === 0) return '<span class="muted">none</span>';
  return list.map(p => `<span class="param ${cls || ""}">${escapeHtml(p)}</span>`).join(" ");
}

function edgeLabel(from, to) {
  const e = DATA.edges.find(e => e.from === from && e.to === to);
  return e ? e.label.join(", ") : "";
}

function renderSummary() {
  const t = DATA.totals;
  const el = document.getElementById("summary");
  const seed = DATA.root ? `<span class="pill">seed: <b>${escapeHtml(DATA.root.seed.join(", "))}</b></span>` : "";
  el.innerHTML = `
    ${seed}
    <span class="pill">programs: <b>${t.programs}</b></span>
    <span class="pill">edges: <b>${t.edges}</b></span>
    <span class="pill">parameters: <b>${t.parameters}</b></span>
    <span class="pill">passes: <b>${t.passes}</b></span>
  `;
}

function nodeMatches(node) {
  if (!state.search) return true;
  const s = state.search.toLowerCase();
  return node.id.toLowerCase().includes(s) || node.outputs.some(p => p.toLowerCase().includes(s));
}

function renderList() {
  const list = document.getElementById("list");
  list.innerHTML = "";
  for (const node of Object.values(DATA.nodes)) {
    if (!nodeMatches(node)) continue;
    const row = document.createElement("div");
    row.className = "program"
      + (state.selected === node.id ? " selected" : "")
      + (node.virtual_root ? " root" : "");
    row.onclick = () => selectNode(node.id);
    row.innerHTML = `${escapeHtml(node.id)} <span class="muted">(${node.children.length} out, ${node.parents.length} in)</span>`;
    list.appendChild(row);
  }
}

function selectNode(id) {
  state.selected = id;
  const node = DATA.nodes[id];
  document.getElementById("title").textContent = node.virtual_root ? `${id} (seed)` : id;

  const rows = [
    ["requires", node.requirement_sets.length
      ? node.requirement_sets.map(b => params(b)).join('<br><span class="muted">or</span><br>')
      : '<span class="muted">nothing</span>'],
    ["declared outputs", params(node.declared_outputs)],
    ["inherited outputs", params(node.inherited_outputs, "inherited")],
    ["feeds", node.children.map(c => `${escapeHtml(c)} <span class="muted">(${escapeHtml(edgeLabel(id, c))})</span>`).join("<br>")],
    ["fed by", node.parents.map(p => `${escapeHtml(p)} <span class="muted">(${escapeHtml(edgeLabel(p, id))})</span>`).join("<br>")],
    ["commands", node.commands.map(c => `<code>${escapeHtml(c)}</code>`).join("<br>")],
    ["comments", node.comments.map(escapeHtml).join("<br>")],
    ["filter", node.filter ? `<code>${escapeHtml(node.filter)}</code>` : ""],
    ["regex", Object.entries(node.regex).map(([k, v]) => `${escapeHtml(k)}: <code>${escapeHtml(v)}</code>`).join("<br>")],
  ];

  const body = document.getElementById("detailsBody");
  body.innerHTML = "";
  for (const [key, value] of rows) {
    if (!value) continue;
    const tr = document.createElement("tr");
    tr.innerHTML = `<th>${key}</th><td>${value}</td>`;
    body.appendChild(tr);
  }
  document.getElementById("details").style.display = "table";

  renderList();
}

document.getElementById("search").addEventListener("input", (e) => {
  state.search = e.target.value || "";
  renderList();
});

renderSummary();
renderList();
if (DATA.root) selectNode(DATA.root.id);
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
