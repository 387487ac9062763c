//! Server-rendered HTML for the registration flow.

pub const INVALID_PHONE_MESSAGE: &str =
    "Please enter a valid phone number with country code (e.g., +919384350120)";

const STYLE: &str = "body{font-family:sans-serif;max-width:32rem;margin:3rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem}input{width:100%;padding:.4rem}\
.flash{background:#fde8e8;border:1px solid #f5a5a5;padding:.6rem;margin:1rem 0}\
.ok{background:#e6f6ea;border-color:#9ad3a8}button{margin-top:1rem;padding:.5rem 1rem}";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// The registration form, optionally with a flashed message and the previous input.
pub fn render_form(flash: Option<&str>, name: &str, phone: &str) -> String {
    let flash = flash
        .map(|msg| format!(r#"<div class="flash">{}</div>"#, html_escape(msg)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Daily News Audio</h1>
<p>Register your phone number to receive today's headlines as an audio message.</p>
{flash}
<form method="post" action="/">
<label for="name">Name</label>
<input id="name" name="name" type="text" value="{name}" required>
<label for="phone">Phone number (with country code)</label>
<input id="phone" name="phone" type="tel" value="{phone}" placeholder="+919384350120" required>
<button type="submit">Register</button>
</form>"#,
        name = html_escape(name),
        phone = html_escape(phone),
    );
    layout("Daily News Audio", &body)
}

/// Confirmation shown after a registration started a run.
pub fn render_success(name: &str, phone: &str, run_id: &str) -> String {
    let body = format!(
        r#"<h1>Registered</h1>
<div class="flash ok">Thank you, {name}! Your phone number {phone} has been registered successfully.</div>
<p>Your news audio is being prepared: <span id="status">running</span></p>
<p><a href="/runs/{run_id}">Check status</a> · <a href="/">Back</a></p>
<script>
async function poll() {{
  const res = await fetch("/runs/{run_id}");
  const s = await res.json();
  const el = document.getElementById("status");
  if (s.running) {{ el.textContent = "running"; setTimeout(poll, 2000); }}
  else if (s.error) {{ el.textContent = "failed: " + s.error; }}
  else {{ el.textContent = "completed"; }}
}}
poll();
</script>"#,
        name = html_escape(name),
        phone = html_escape(phone),
        run_id = html_escape(run_id),
    );
    layout("Registered", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_escapes_input() {
        let html = render_form(Some(INVALID_PHONE_MESSAGE), "<b>Ada</b>", "12\"3");
        assert!(html.contains(INVALID_PHONE_MESSAGE));
        assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt;"));
        assert!(html.contains("12&quot;3"));
        assert!(!html.contains("<b>Ada</b>"));
    }

    #[test]
    fn test_success_message() {
        let html = render_success("Ada", "+14155550132", "abc");
        assert!(html.contains(
            "Thank you, Ada! Your phone number +14155550132 has been registered successfully."
        ));
        assert!(html.contains(r#"href="/runs/abc""#));
    }
}
