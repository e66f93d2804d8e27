//! Host page served at `/`.
//!
//! All state lives on the server; the page posts events and paints whatever
//! comes back. The preview iframe is recreated for every frame so each commit
//! gets a fresh sandboxed context.

pub const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Devbox</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: #f5f5f5;
            color: #111827;
            height: 100vh;
            display: flex;
            flex-direction: column;
        }
        body.dark { background: #030712; color: #f9fafb; }
        header {
            display: flex;
            align-items: center;
            gap: 8px;
            padding: 10px 16px;
            background: #111827;
            color: #e5e7eb;
            flex-wrap: wrap;
        }
        header h1 { font-size: 16px; margin-right: 12px; }
        button, label.button {
            font-size: 13px;
            padding: 6px 10px;
            border-radius: 6px;
            border: 1px solid #374151;
            background: #1f2937;
            color: #e5e7eb;
            cursor: pointer;
        }
        button.active { background: #4f46e5; border-color: #4f46e5; }
        button:disabled { opacity: 0.4; cursor: not-allowed; }
        .spacer { flex: 1; }
        .tool { display: none; flex: 1; min-height: 0; }
        .tool.active { display: flex; }
        .pane { flex: 1; display: flex; flex-direction: column; min-width: 0; }
        .pane.hidden { display: none; }
        .pane-title {
            font-size: 11px;
            text-transform: uppercase;
            letter-spacing: 0.08em;
            padding: 6px 12px;
            background: #e5e7eb;
            color: #4b5563;
            display: flex;
            justify-content: space-between;
        }
        textarea {
            flex: 1;
            resize: none;
            border: none;
            outline: none;
            padding: 12px;
            font-family: Monaco, Menlo, "Courier New", monospace;
            font-size: 13px;
            line-height: 1.6;
            background: #030712;
            color: #f3f4f6;
        }
        #preview-host { flex: 1; position: relative; background: white; }
        #preview-host iframe { position: absolute; inset: 0; width: 100%; height: 100%; border: none; }
        .dot { width: 8px; height: 8px; border-radius: 50%; display: inline-block; background: #22c55e; }
        .dot.manual { background: #9ca3af; }
        #prompt-panel { display: none; gap: 8px; padding: 8px 16px; background: #1f2937; }
        #prompt-panel.open { display: flex; }
        #prompt-panel input { flex: 1; padding: 6px 10px; border-radius: 6px; border: none; }
        .controls { display: flex; flex-direction: column; justify-content: center; gap: 8px; padding: 12px; background: #111827; }
        .error { padding: 12px; color: #dc2626; font-family: Monaco, monospace; font-size: 13px; background: #fef2f2; flex: 1; }
        #markdown-output { flex: 1; overflow: auto; padding: 24px; background: white; color: #111827; }
    </style>
</head>
<body>
    <header>
        <h1>Devbox</h1>
        <button data-tool="html" class="active">HTML Preview</button>
        <button data-tool="json">JSON Formatter</button>
        <button data-tool="markdown">Markdown</button>
        <span class="spacer"></span>
        <button id="theme">Theme</button>
    </header>

    <section id="tool-html" class="tool active" style="flex-direction: column;">
        <header>
            <button data-view="SPLIT" class="active">Split</button>
            <button data-view="CODE">Code</button>
            <button data-view="PREVIEW">Preview</button>
            <span class="spacer"></span>
            <label><input type="checkbox" id="auto" checked> Auto refresh</label>
            <button id="run" disabled>Run</button>
            <label class="button">Upload<input type="file" id="upload" accept=".html,.htm,.txt" hidden></label>
            <a href="/api/download"><button>Download</button></a>
            <button id="clear">Clear</button>
            <button id="ai">AI</button>
        </header>
        <div id="prompt-panel">
            <input id="prompt" placeholder="Describe the page you want...">
            <button id="generate">Generate</button>
        </div>
        <div style="display: flex; flex: 1; min-height: 0;">
            <div class="pane" id="pane-editor">
                <div class="pane-title"><span>HTML source</span><span>editable</span></div>
                <textarea id="editor" spellcheck="false"></textarea>
            </div>
            <div class="pane" id="pane-preview">
                <div class="pane-title"><span>Preview</span><span><i class="dot" id="mode-dot"></i> <span id="mode-text">live</span></span></div>
                <div id="preview-host"></div>
            </div>
        </div>
    </section>

    <section id="tool-json" class="tool">
        <div class="pane">
            <div class="pane-title"><span>Input</span><span>paste JSON</span></div>
            <textarea id="json-input" spellcheck="false" placeholder='{"key": "value"}'></textarea>
        </div>
        <div class="controls">
            <button id="json-format">Format</button>
            <button id="json-minify">Minify</button>
            <button id="json-sample">Sample</button>
            <button id="json-clear">Clear</button>
            <button id="json-copy">Copy</button>
        </div>
        <div class="pane">
            <div class="pane-title"><span>Result</span></div>
            <textarea id="json-output" readonly></textarea>
            <div id="json-error" class="error" hidden></div>
        </div>
    </section>

    <section id="tool-markdown" class="tool">
        <div class="pane">
            <div class="pane-title"><span>Markdown</span></div>
            <textarea id="markdown-input" spellcheck="false"></textarea>
        </div>
        <div class="pane">
            <div class="pane-title"><span>Preview</span><span><button id="markdown-clear">Clear</button> <button id="markdown-copy">Copy HTML</button></span></div>
            <article id="markdown-output"></article>
        </div>
    </section>

    <script>
        const $ = (id) => document.getElementById(id);
        const editor = $('editor');
        let queue = Promise.resolve();
        let inFlight = 0;

        async function api(path, body, raw) {
            const response = await fetch(path, {
                method: 'POST',
                headers: raw ? {} : { 'Content-Type': 'application/json' },
                body: raw ? body : JSON.stringify(body),
            });
            const data = await response.json();
            if (!response.ok) throw new Error(data.error || response.statusText);
            return data;
        }

        // Events are sent one at a time, in order
        function enqueue(task) {
            inFlight++;
            queue = queue.then(task).catch((err) => console.error(err)).finally(() => inFlight--);
            return queue;
        }

        // A new element every frame: the old context and its scripts go away
        function mountFrame(frame) {
            $('preview-host').innerHTML = frame.iframe;
        }

        function applyLayout(layout) {
            $('pane-editor').classList.toggle('hidden', layout.editor !== 'visible');
            $('pane-preview').classList.toggle('hidden', layout.preview !== 'visible');
            document.querySelectorAll('[data-view]').forEach((b) =>
                b.classList.toggle('active', b.dataset.view === layout.mode));
        }

        function applyPolicy(policy) {
            const manual = policy === 'manual';
            $('auto').checked = !manual;
            $('run').disabled = !manual;
            $('mode-dot').classList.toggle('manual', manual);
            $('mode-text').textContent = manual ? 'manual' : 'live';
        }

        async function init() {
            const state = await (await fetch('/api/state')).json();
            editor.value = state.source;
            applyLayout(state.layout);
            applyPolicy(state.policy);

            const events = new EventSource('/api/preview');
            events.addEventListener('frame', (e) => mountFrame(JSON.parse(e.data)));
            events.addEventListener('source', (e) => {
                const change = JSON.parse(e.data);
                if (inFlight === 0 && change.value !== editor.value) editor.value = change.value;
            });
        }

        editor.addEventListener('input', () => {
            const value = editor.value;
            enqueue(() => api('/api/source', { value }));
        });

        editor.addEventListener('keydown', (e) => {
            if (e.key !== 'Tab' || editor.readOnly) return;
            e.preventDefault();
            const start = [...editor.value.slice(0, editor.selectionStart)].length;
            const end = [...editor.value.slice(0, editor.selectionEnd)].length;
            enqueue(async () => {
                const result = await api('/api/tab', { start, end });
                editor.value = result.value;
                const offset = [...result.value].slice(0, result.cursor).join('').length;
                editor.selectionStart = editor.selectionEnd = offset;
            });
        });

        document.querySelectorAll('[data-view]').forEach((button) =>
            button.addEventListener('click', () =>
                enqueue(async () => applyLayout(await api('/api/view', { mode: button.dataset.view })))));

        $('auto').addEventListener('change', (e) =>
            enqueue(async () => {
                const state = await api('/api/policy', { policy: e.target.checked ? 'auto' : 'manual' });
                applyPolicy(state.policy);
            }));

        $('run').addEventListener('click', () => enqueue(() => api('/api/run', {})));

        $('upload').addEventListener('change', (e) => {
            const file = e.target.files[0];
            if (!file) return;
            enqueue(async () => {
                await api('/api/upload?name=' + encodeURIComponent(file.name), await file.arrayBuffer(), true);
                editor.value = await file.text();
                e.target.value = '';
            });
        });

        $('clear').addEventListener('click', () => {
            const confirmed = window.confirm('Clear all content?');
            enqueue(async () => {
                const result = await api('/api/clear', { confirmed });
                if (result.cleared) editor.value = '';
            });
        });

        $('ai').addEventListener('click', () => $('prompt-panel').classList.toggle('open'));

        // Generation bypasses the edit queue. The editor is read-only until the
        // result lands so no stale edit can be replayed over it.
        $('generate').addEventListener('click', async () => {
            const prompt = $('prompt').value;
            if (!prompt.trim()) return;
            const button = $('generate');
            button.disabled = true;
            editor.readOnly = true;
            try {
                await queue;
                const result = await api('/api/generate', { prompt });
                editor.value = result.source;
                if (result.applied) {
                    $('prompt').value = '';
                } else {
                    window.alert(result.notice);
                }
            } catch (err) {
                window.alert(err.message);
            } finally {
                editor.readOnly = false;
                button.disabled = false;
            }
        });

        // Tool navigation and theme are page-only state
        document.querySelectorAll('[data-tool]').forEach((button) =>
            button.addEventListener('click', () => {
                document.querySelectorAll('.tool').forEach((t) => t.classList.remove('active'));
                document.querySelectorAll('[data-tool]').forEach((b) => b.classList.remove('active'));
                $('tool-' + button.dataset.tool).classList.add('active');
                button.classList.add('active');
            }));
        $('theme').addEventListener('click', () => document.body.classList.toggle('dark'));

        function showJson(formatter) {
            $('json-input').value = formatter.input;
            $('json-output').value = formatter.output;
            $('json-output').hidden = !!formatter.error;
            $('json-error').hidden = !formatter.error;
            $('json-error').textContent = formatter.error ? 'Error: ' + formatter.error : '';
        }
        function showMarkdown(preview) {
            $('markdown-input').value = preview.markdown;
            $('markdown-output').innerHTML = preview.html;
        }
        async function copyFrom(path) {
            const result = await (await fetch(path)).json();
            if (result.text) navigator.clipboard.writeText(result.text);
        }

        $('json-format').addEventListener('click', async () =>
            showJson(await api('/api/json/format', { input: $('json-input').value, style: 'pretty' })));
        $('json-minify').addEventListener('click', async () =>
            showJson(await api('/api/json/format', { input: $('json-input').value, style: 'minified' })));
        $('json-sample').addEventListener('click', async () => showJson(await api('/api/json/sample', {})));
        $('json-clear').addEventListener('click', async () => {
            const result = await api('/api/json/clear', { confirmed: window.confirm('Clear all content?') });
            showJson(result.state);
        });
        $('json-copy').addEventListener('click', () => copyFrom('/api/json/copy'));

        $('markdown-input').addEventListener('input', async () => {
            const result = await api('/api/markdown/render', { markdown: $('markdown-input').value });
            $('markdown-output').innerHTML = result.html;
        });
        $('markdown-clear').addEventListener('click', async () => {
            const result = await api('/api/markdown/clear', { confirmed: window.confirm('Clear all content?') });
            showMarkdown(result.state);
        });
        $('markdown-copy').addEventListener('click', () => copyFrom('/api/markdown/copy'));

        async function initTools() {
            const tools = await (await fetch('/api/tools')).json();
            showJson(tools.json);
            showMarkdown(tools.markdown);
        }

        init();
        initTools();
    </script>
</body>
</html>
"#;
