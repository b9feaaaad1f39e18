//! HTML reporter: generates a self-contained item-analysis dashboard
//!
//! Embeds the analyzed datasets as JSON and renders everything
//! client-side with vanilla JS: metric cards, the question table with
//! band badges, and a facility/discrimination scatter chart. Band
//! thresholds are embedded from the library constants so the chart
//! guides and the badges cannot drift apart.

use crate::analyzer::DatasetStats;
use crate::{
    ExamAnalysis, DISCRIMINATION_EXCELLENT_MIN, DISCRIMINATION_GOOD_MIN, FACILITY_OPTIMAL_MAX,
    FACILITY_OPTIMAL_MIN,
};
use chrono::Utc;

/// Escapes a string for embedding inside a script block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; we just need to
    // ensure no </script> can appear inside the block.
    s.replace("</script>", "<\\/script>")
}

/// Reporter that generates a self-contained HTML dashboard
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full HTML report
    pub fn report(&self, results: &[ExamAnalysis], stats: &DatasetStats) -> String {
        let data_json = serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string());

        let mut html = String::with_capacity(32_768);
        html.push_str(Self::template_head());
        html.push_str("<script>const DATA=");
        html.push_str(&escape_json_for_script(&data_json));
        html.push_str(";const STATS={datasets:");
        html.push_str(&stats.datasets.to_string());
        html.push_str(",items:");
        html.push_str(&stats.total_items.to_string());
        html.push_str(",review:");
        html.push_str(&stats.review_items.to_string());
        html.push_str(",generatedAt:\"");
        html.push_str(&Utc::now().to_rfc3339());
        html.push_str("\"};const THRESHOLDS={discriminationExcellent:");
        html.push_str(&DISCRIMINATION_EXCELLENT_MIN.to_string());
        html.push_str(",discriminationGood:");
        html.push_str(&DISCRIMINATION_GOOD_MIN.to_string());
        html.push_str(",facilityOptimalMin:");
        html.push_str(&FACILITY_OPTIMAL_MIN.to_string());
        html.push_str(",facilityOptimalMax:");
        html.push_str(&FACILITY_OPTIMAL_MAX.to_string());
        html.push_str("};</script>\n");
        html.push_str(Self::template_body());
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>");
        html
    }

    fn template_head() -> &'static str {
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Item Analysis Dashboard</title>
<style>
:root{--bg:#11131a;--panel:#1a1d27;--border:#2a2e3d;--text:#e8eaf2;--muted:#8a90a5;
--good:#34c27b;--caution:#e2b93b;--warning:#e25555;--accent:#6a7bff}
*{box-sizing:border-box;margin:0;padding:0}
body{background:var(--bg);color:var(--text);font:14px/1.5 -apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;padding:2rem}
h1{font-size:1.4rem;margin-bottom:.25rem}
h2{font-size:1.1rem;margin:2rem 0 1rem}
.muted{color:var(--muted)}
.cards{display:grid;grid-template-columns:repeat(auto-fit,minmax(180px,1fr));gap:1rem;margin:1rem 0}
.card{background:var(--panel);border:1px solid var(--border);border-radius:10px;padding:1rem}
.card .label{font-size:.75rem;text-transform:uppercase;letter-spacing:.05em;color:var(--muted)}
.card .value{font-size:1.3rem;font-weight:600;margin-top:.25rem}
table{width:100%;border-collapse:collapse;background:var(--panel);border:1px solid var(--border);border-radius:10px;overflow:hidden}
th,td{padding:.55rem .8rem;text-align:left;border-bottom:1px solid var(--border)}
th{font-size:.75rem;text-transform:uppercase;letter-spacing:.05em;color:var(--muted)}
tr:last-child td{border-bottom:none}
.badge{display:inline-block;padding:.1rem .55rem;border-radius:999px;font-size:.75rem;font-weight:600}
.badge.good{background:rgba(52,194,123,.15);color:var(--good)}
.badge.caution{background:rgba(226,185,59,.15);color:var(--caution)}
.badge.warning{background:rgba(226,85,85,.15);color:var(--warning)}
.chart-wrap{background:var(--panel);border:1px solid var(--border);border-radius:10px;padding:1rem;margin:1rem 0}
.dot.good{fill:var(--good)}.dot.caution{fill:var(--caution)}.dot.warning{fill:var(--warning)}
.guide{stroke:var(--border);stroke-dasharray:4 4}
.axis-label{fill:var(--muted);font-size:10px}
.empty{padding:3rem;text-align:center;color:var(--muted)}
footer{margin-top:2rem;color:var(--muted);font-size:.8rem}
</style>
</head>
<body>
"#
    }

    fn template_body() -> &'static str {
        r#"<header>
<h1>Item Analysis Dashboard</h1>
<p class="muted" id="subtitle"></p>
</header>
<main id="main"></main>
<footer id="footer"></footer>
"#
    }

    fn template_script() -> &'static str {
        r#"<script>
(function(){
  const main=document.getElementById('main');
  document.getElementById('subtitle').textContent=
    STATS.datasets+' dataset(s), '+STATS.items+' items, '+STATS.review+' to review';
  document.getElementById('footer').textContent='Generated at '+STATS.generatedAt;

  function el(tag,cls,text){
    const n=document.createElement(tag);
    if(cls)n.className=cls;
    if(text!==undefined)n.textContent=text;
    return n;
  }

  function badge(band,tier){
    if(!band)return document.createTextNode('-');
    const names={excellent:'Excellent',good:'Good',poor:'Review',
                 optimal:'Optimal',easy:'Easy',hard:'Hard'};
    return el('span','badge '+tier,names[band]||band);
  }

  // Table badge tiers re-derive from the band value only; the
  // thresholds themselves never appear here.
  const facilityTier={optimal:'good',easy:'caution',hard:'warning'};
  const discriminationTier={excellent:'good',good:'caution',poor:'warning'};

  function metaCards(meta){
    const cards=el('div','cards');
    const entries=[
      ['First-attempt average',meta&&meta.firstAttemptAverage],
      ['Internal consistency',meta&&meta.internalConsistency],
      ['Completed attempts',meta&&meta.completedAttempts],
      ['Error ratio',meta&&meta.errorRatio]
    ];
    for(const [label,value] of entries){
      const card=el('div','card');
      card.appendChild(el('div','label',label));
      card.appendChild(el('div','value',value||'N/A'));
      cards.appendChild(card);
    }
    return cards;
  }

  function questionTable(rows){
    const table=el('table');
    const thead=el('thead');
    const hr=el('tr');
    for(const h of ['Q# / Ref','Type','Facility','Facility band',
                    'Discrimination','Discrimination band','Efficiency'])
      hr.appendChild(el('th',null,h));
    thead.appendChild(hr);
    table.appendChild(thead);
    const tbody=el('tbody');
    for(const row of rows){
      const tr=el('tr');
      tr.appendChild(el('td',null,'Q '+row.reference));
      tr.appendChild(el('td','muted',row.questionType||'-'));
      tr.appendChild(el('td',null,row.facility||'-'));
      const ftd=el('td');
      ftd.appendChild(badge(row.facilityBand,facilityTier[row.facilityBand]));
      tr.appendChild(ftd);
      tr.appendChild(el('td',null,row.discrimination||'-'));
      const dtd=el('td');
      dtd.appendChild(badge(row.discriminationBand,discriminationTier[row.discriminationBand]));
      tr.appendChild(dtd);
      tr.appendChild(el('td','muted',row.efficiency||'-'));
      tbody.appendChild(tr);
    }
    table.appendChild(tbody);
    return table;
  }

  function scatterChart(points){
    const W=720,H=360,PAD=40;
    const maxX=Math.max(100,...points.map(p=>p.facility));
    const maxY=Math.max(100,...points.map(p=>p.discrimination));
    const minX=Math.min(0,...points.map(p=>p.facility));
    const minY=Math.min(0,...points.map(p=>p.discrimination));
    const sx=v=>PAD+(v-minX)/(maxX-minX)*(W-2*PAD);
    const sy=v=>H-PAD-(v-minY)/(maxY-minY)*(H-2*PAD);
    const svg=document.createElementNS('http://www.w3.org/2000/svg','svg');
    svg.setAttribute('viewBox','0 0 '+W+' '+H);
    function line(x1,y1,x2,y2,cls){
      const l=document.createElementNS('http://www.w3.org/2000/svg','line');
      l.setAttribute('x1',x1);l.setAttribute('y1',y1);
      l.setAttribute('x2',x2);l.setAttribute('y2',y2);
      l.setAttribute('class',cls);l.setAttribute('stroke','currentColor');
      svg.appendChild(l);
    }
    function text(x,y,str){
      const t=document.createElementNS('http://www.w3.org/2000/svg','text');
      t.setAttribute('x',x);t.setAttribute('y',y);
      t.setAttribute('class','axis-label');
      t.textContent=str;
      svg.appendChild(t);
    }
    // Axes
    line(PAD,H-PAD,W-PAD,H-PAD,'guide');
    line(PAD,PAD,PAD,H-PAD,'guide');
    text(W/2-60,H-8,'Facility index (%)');
    text(4,PAD-8,'Discrimination (%)');
    // Band guides from the shared threshold table
    for(const x of [THRESHOLDS.facilityOptimalMin,THRESHOLDS.facilityOptimalMax]){
      line(sx(x),PAD,sx(x),H-PAD,'guide');
      text(sx(x)-8,H-PAD+14,x);
    }
    for(const y of [THRESHOLDS.discriminationGood,THRESHOLDS.discriminationExcellent]){
      line(PAD,sy(y),W-PAD,sy(y),'guide');
      text(PAD-28,sy(y)+3,y);
    }
    for(const p of points){
      const c=document.createElementNS('http://www.w3.org/2000/svg','circle');
      c.setAttribute('cx',sx(p.facility));
      c.setAttribute('cy',sy(p.discrimination));
      c.setAttribute('r',5);
      c.setAttribute('class','dot '+p.tier);
      const title=document.createElementNS('http://www.w3.org/2000/svg','title');
      title.textContent=p.label+' ('+p.facility+'%, '+p.discrimination+'%)';
      c.appendChild(title);
      svg.appendChild(c);
    }
    const wrap=el('div','chart-wrap');
    wrap.appendChild(svg);
    return wrap;
  }

  if(DATA.length===0){
    main.appendChild(el('div','empty','Loading exam data...'));
    return;
  }

  for(const dataset of DATA){
    const title=(dataset.meta&&dataset.meta.title)||'(untitled)';
    main.appendChild(el('h2',null,title));
    if(dataset.source)main.appendChild(el('p','muted',dataset.source));
    main.appendChild(metaCards(dataset.meta));
    if(dataset.tableRows.length===0){
      main.appendChild(el('div','empty','No questions in this export.'));
      continue;
    }
    main.appendChild(questionTable(dataset.tableRows));
    if(dataset.chartPoints.length>0){
      main.appendChild(scatterChart(dataset.chartPoints));
    }
  }
})();
</script>
"#
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}
