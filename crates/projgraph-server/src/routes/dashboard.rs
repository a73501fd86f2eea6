//! The dashboard page. Static HTML; all data comes from `/api/*`.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Project Knowledge Graph</title>
<script src="https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js"></script>
<style>
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:0;padding:24px 32px;color:#262730;background:#fff}
h1{font-size:26px;margin:0 0 18px}
label{font-size:13px;color:#555;display:block;margin-bottom:4px}
select{font-size:14px;padding:6px 8px;border:1px solid #ccc;border-radius:6px;min-width:320px}
#controls{display:flex;gap:18px;align-items:flex-end;margin-bottom:18px}
#metrics{display:flex;gap:28px;margin:12px 0 18px;flex-wrap:wrap}
.metric .m-l{font-size:12px;color:#777}
.metric .m-v{font-size:24px;font-weight:600}
.msg{padding:10px 14px;border-radius:6px;margin:10px 0;font-size:14px;display:none}
.msg.info{background:#e8f1fb;color:#174e86}
.msg.warn{background:#fff6e0;color:#7a5300}
.msg.error{background:#fde8e8;color:#8a1c1c}
#graph{height:600px;border:1px solid #e6e6e6;border-radius:6px}
details{margin-top:18px}
summary{cursor:pointer;font-size:14px}
table{border-collapse:collapse;width:100%;margin-top:8px;font-size:13px}
th,td{border-bottom:1px solid #eee;text-align:left;padding:6px 8px}
th{background:#fafafa}
#legend{display:flex;gap:14px;font-size:12px;color:#555;margin-top:6px}
.dot{display:inline-block;width:10px;height:10px;border-radius:50%;margin-right:4px}
</style>
</head>
<body>
<h1>Project Knowledge Graph</h1>

<div id="halt" class="msg warn"></div>

<div id="controls">
  <div>
    <label for="project">Choose a project</label>
    <select id="project"></select>
  </div>
  <div>
    <label for="hops">Depth</label>
    <select id="hops" style="min-width:90px">
      <option value="1">1 hop</option>
      <option value="2" selected>2 hops</option>
    </select>
  </div>
</div>

<div id="metrics"></div>
<div id="notice" class="msg info"></div>
<div id="error" class="msg error"></div>

<div id="graph"></div>
<div id="legend">
  <span><span class="dot" style="background:#d62728"></span>selected</span>
  <span><span class="dot" style="background:#1f77b4"></span>project</span>
  <span><span class="dot" style="background:#ff7f0e"></span>organization</span>
  <span><span class="dot" style="background:#2ca02c"></span>theme</span>
  <span><span class="dot" style="background:#7f7f7f"></span>other</span>
</div>

<details id="raw">
  <summary>Raw data</summary>
  <table>
    <thead><tr><th>Node</th><th>Kind</th><th>Labels</th><th>Hops</th><th>Path</th></tr></thead>
    <tbody id="rows"></tbody>
  </table>
</details>

<script>
const $ = (id) => document.getElementById(id);
let network = null;

function show(id, text) {
  const el = $(id);
  el.textContent = text || '';
  el.style.display = text ? 'block' : 'none';
}

function metric(label, value) {
  const box = document.createElement('div');
  box.className = 'metric';
  const l = document.createElement('div');
  l.className = 'm-l';
  l.textContent = label;
  const v = document.createElement('div');
  v.className = 'm-v';
  v.textContent = value === null || value === undefined ? '—' : String(value);
  box.append(l, v);
  return box;
}

function renderMetrics(s) {
  const m = $('metrics');
  m.replaceChildren(
    metric('Status', s.status),
    metric('Start date', s.start_date),
    metric('Budget', s.budget),
    metric('Connected nodes', s.neighbors),
    metric('Relationships', s.edges),
  );
}

function renderRows(rows) {
  const body = $('rows');
  body.replaceChildren(...rows.map((r) => {
    const tr = document.createElement('tr');
    for (const v of [r.node, r.kind, r.labels, r.hops, r.path]) {
      const td = document.createElement('td');
      td.textContent = String(v);
      tr.append(td);
    }
    return tr;
  }));
}

function renderGraph(graph) {
  if (network) { network.destroy(); network = null; }
  if (!graph) { $('graph').textContent = ''; return; }
  const nodes = new vis.DataSet(graph.nodes.map((n) => ({
    id: n.id, label: n.label, title: n.title, color: n.color, size: n.size, group: n.group,
  })));
  const edges = new vis.DataSet(graph.edges.map((e) => ({
    id: e.id, from: e.from, to: e.to, label: e.label, arrows: 'to',
  })));
  network = new vis.Network($('graph'), { nodes, edges }, {
    nodes: { shape: 'dot', font: { size: 14 } },
    edges: { font: { size: 11, align: 'middle' }, color: { color: '#999' } },
    physics: { stabilization: { iterations: 150 } },
  });
}

async function loadGraph() {
  const project = $('project').value;
  const hops = $('hops').value;
  show('notice'); show('error');
  const res = await fetch('/api/graph?project=' + encodeURIComponent(project) + '&hops=' + hops);
  const body = await res.json();
  if (!res.ok) {
    show('error', body.error || 'Request failed');
    renderGraph(null); renderRows([]); $('metrics').replaceChildren();
    return;
  }
  renderMetrics(body.summary);
  show('notice', body.notice);
  if (body.error) {
    show('error', body.error);
    $('raw').open = true;
  }
  renderGraph(body.graph);
  renderRows(body.rows);
}

async function init() {
  const res = await fetch('/api/projects');
  const body = await res.json();
  if (!res.ok) { show('halt', body.error || 'Could not list projects'); return; }
  if (!body.projects.length) {
    show('halt', 'No projects found. Load a CSV with `projgraph load` or add demo data with `projgraph seed`.');
    $('controls').style.display = 'none';
    $('graph').style.display = 'none';
    $('legend').style.display = 'none';
    $('raw').style.display = 'none';
    return;
  }
  const select = $('project');
  select.replaceChildren(...body.projects.map((name) => {
    const o = document.createElement('option');
    o.value = name; o.textContent = name;
    return o;
  }));
  const health = await fetch('/api/health').then((r) => r.json()).catch(() => ({}));
  if (health.defaultHops) $('hops').value = String(health.defaultHops);
  select.addEventListener('change', loadGraph);
  $('hops').addEventListener('change', loadGraph);
  loadGraph();
}

init().catch((e) => show('halt', String(e)));
</script>
</body>
</html>
"##;
