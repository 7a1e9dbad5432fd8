//! Management UI shells.
//!
//! Minimal server-rendered pages for the management prefix. The pages
//! call the JSON API from inline scripts; full asset serving is handled
//! by the surrounding gateway, not here.

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

fn page(title: &str, prefix: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Gatehouse</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
</style>
</head>
<body>
<nav>
<a href="{prefix}">Dashboard</a>
<a href="{prefix}/sessions">Sessions</a>
<a href="{prefix}/tokens">Tokens</a>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#
    ))
}

/// GET {prefix}/login
///
/// Public login form. On success the inline script follows the
/// `redirect` query parameter, defaulting to the dashboard.
pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    let prefix = state.config.server.management_mount();
    let body = format!(
        r#"<form id="login">
<p><label>Username <input name="username" autocomplete="username"></label></p>
<p><label>Password <input name="password" type="password" autocomplete="current-password"></label></p>
<p><button type="submit">Sign in</button></p>
<p id="error" style="color:#b00"></p>
</form>
<script>
document.getElementById('login').addEventListener('submit', async (event) => {{
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('{prefix}/api/auth/login', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ username: form.get('username'), password: form.get('password') }}),
  }});
  if (response.ok) {{
    const target = new URLSearchParams(window.location.search).get('redirect');
    window.location = target || '{prefix}';
  }} else {{
    document.getElementById('error').textContent = 'Login failed';
  }}
}});
</script>"#
    );
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Login - Gatehouse</title>
<style>body {{ font-family: system-ui, sans-serif; margin: 4rem auto; max-width: 22rem; }}</style>
</head>
<body>
<h1>Gatehouse</h1>
{body}
</body>
</html>
"#
    ))
}

/// GET {prefix}
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let prefix = state.config.server.management_mount();
    let body = format!(
        r#"<p>Aggregate traffic and cache counters.</p>
<pre id="stats">Loading...</pre>
<script>
fetch('{prefix}/api/admin/stats')
  .then((response) => response.json())
  .then((payload) => {{
    document.getElementById('stats').textContent = JSON.stringify(payload.data, null, 2);
  }});
</script>"#
    );
    page("Dashboard", &prefix, &body)
}

/// GET {prefix}/sessions
pub async fn sessions_page(State(state): State<AppState>) -> Html<String> {
    let prefix = state.config.server.management_mount();
    let body = format!(
        r#"<table id="sessions">
<tr><th>User</th><th>IP</th><th>Browser</th><th>Valid until</th><th></th></tr>
</table>
<script>
async function load() {{
  const response = await fetch('{prefix}/api/admin/sessions');
  const payload = await response.json();
  const table = document.getElementById('sessions');
  for (const session of payload.data) {{
    const row = table.insertRow();
    row.insertCell().textContent = session.username;
    row.insertCell().textContent = session.ip_address;
    row.insertCell().textContent = session.browser_family;
    row.insertCell().textContent = session.valid_until;
    const button = document.createElement('button');
    button.textContent = 'Close';
    button.onclick = async () => {{
      await fetch('{prefix}/api/admin/sessions/' + encodeURIComponent(session.token), {{ method: 'DELETE' }});
      window.location.reload();
    }};
    row.insertCell().appendChild(button);
  }}
}}
load();
</script>"#
    );
    page("Sessions", &prefix, &body)
}

/// GET {prefix}/tokens
pub async fn tokens_page(State(state): State<AppState>) -> Html<String> {
    let prefix = state.config.server.management_mount();
    let body = format!(
        r#"<table id="tokens">
<tr><th>Name</th><th>Active</th><th>Uses</th><th>Expires</th><th></th></tr>
</table>
<script>
async function load() {{
  const response = await fetch('{prefix}/api/tokens');
  const payload = await response.json();
  const table = document.getElementById('tokens');
  for (const token of payload.data) {{
    const row = table.insertRow();
    row.insertCell().textContent = token.name;
    row.insertCell().textContent = token.is_active;
    row.insertCell().textContent = token.usage_count;
    row.insertCell().textContent = token.expires_at || 'never';
    const button = document.createElement('button');
    button.textContent = 'Revoke';
    button.onclick = async () => {{
      await fetch('{prefix}/api/tokens/' + token.id, {{ method: 'DELETE' }});
      window.location.reload();
    }};
    row.insertCell().appendChild(button);
  }}
}}
load();
</script>"#
    );
    page("API Tokens", &prefix, &body)
}
