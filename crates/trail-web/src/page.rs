//! Static HTML for the dashboard index page.
//!
//! The page carries no server-rendered data: the table, chart and summary
//! are fetched from the JSON/SVG endpoints by a small inline script, so the
//! markup stays a plain constant.

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>cmdtrail - Command Usage</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, monospace;
            background: #0d1117;
            color: #c9d1d9;
            padding: 32px 24px;
            max-width: 960px;
            margin: 0 auto;
        }
        h1 {
            font-size: 20px;
            color: #58a6ff;
            margin-bottom: 4px;
        }
        .subtitle { color: #8b949e; font-size: 13px; margin-bottom: 20px; }
        .sources { margin-bottom: 20px; }
        .source-chip {
            display: inline-block;
            border: 1px solid #30363d;
            border-radius: 12px;
            padding: 2px 10px;
            margin-right: 6px;
            font-size: 12px;
        }
        .source-chip.ok { color: #3fb950; }
        .source-chip.missing { color: #f85149; }
        #search {
            width: 100%;
            padding: 10px 12px;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            color: #c9d1d9;
            font-size: 14px;
            margin-bottom: 8px;
        }
        #search:focus { outline: none; border-color: #58a6ff; }
        .stats { color: #8b949e; font-size: 12px; margin-bottom: 16px; }
        .panel {
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            margin-bottom: 20px;
            overflow: hidden;
        }
        #chart { display: block; width: 100%; background: #ffffff; }
        table { width: 100%; border-collapse: collapse; font-size: 13px; }
        th, td {
            text-align: left;
            padding: 8px 14px;
            border-bottom: 1px solid #21262d;
        }
        th { color: #8b949e; font-weight: 600; }
        td.count { text-align: right; color: #58a6ff; }
        th.count { text-align: right; }
        .empty { padding: 20px 14px; color: #8b949e; }
    </style>
</head>
<body>
    <h1>Command Usage Frequency</h1>
    <div class="subtitle">Evidence aggregated from shell history, the process table, system logs and auditd</div>
    <div class="sources" id="sources"></div>
    <input id="search" type="text" placeholder="Search for a command..." autocomplete="off">
    <div class="stats" id="stats"></div>
    <div class="panel"><img id="chart" src="/chart.svg" alt="command usage chart"></div>
    <div class="panel">
        <table>
            <thead><tr><th>Command</th><th class="count">Count</th></tr></thead>
            <tbody id="rows"></tbody>
        </table>
    </div>
    <script>
        const esc = s => s.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
        const search = document.getElementById('search');

        async function refresh() {
            const q = search.value;
            const res = await fetch('/api/commands?q=' + encodeURIComponent(q));
            const data = await res.json();

            const rows = document.getElementById('rows');
            if (data.commands.length === 0) {
                rows.innerHTML = '<tr><td class="empty" colspan="2">no matching commands</td></tr>';
            } else {
                rows.innerHTML = data.commands
                    .map(c => '<tr><td>' + esc(c.command) + '</td><td class="count">' + c.count + '</td></tr>')
                    .join('');
            }

            document.getElementById('stats').textContent =
                data.matched + ' of ' + data.total + ' commands shown';
            document.getElementById('chart').src = '/chart.svg?q=' + encodeURIComponent(q);
        }

        async function loadSummary() {
            const res = await fetch('/api/summary');
            const summary = await res.json();
            document.getElementById('sources').innerHTML = summary.sources
                .map(s => '<span class="source-chip ' + (s.available ? 'ok' : 'missing') + '">'
                    + esc(s.kind) + (s.available ? ' : ' + s.commands_extracted : ' : unavailable')
                    + '</span>')
                .join('');
        }

        search.addEventListener('input', refresh);
        refresh();
        loadSummary();
    </script>
</body>
</html>
"##;

/// The dashboard index page.
pub fn render_index_page() -> String {
    INDEX_HTML.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wires_the_endpoints() {
        let html = render_index_page();
        assert!(html.contains("/api/commands"));
        assert!(html.contains("/api/summary"));
        assert!(html.contains("/chart.svg"));
    }

    #[test]
    fn test_page_has_search_input() {
        let html = render_index_page();
        assert!(html.contains("id=\"search\""));
    }
}
