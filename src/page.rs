//! HTML for the booking page: a layout shell with the booking form mounted
//! inside it.

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f6f4; color: #222; }
header, footer { padding: 1rem 2rem; background: #24323f; color: #fff; }
main { max-width: 32rem; margin: 2rem auto; padding: 0 1rem; }
form { display: grid; gap: 0.75rem; }
label { display: grid; gap: 0.25rem; font-weight: 600; }
input, textarea, button { font: inherit; padding: 0.5rem; }
#booking-status.error { color: #a01818; }
#booking-status.success { color: #186a22; }
"#;

const FORM_SCRIPT: &str = r#"
const form = document.getElementById("booking-form");
const status = document.getElementById("booking-status");
const optional = (value) => (value.trim() === "" ? null : value.trim());

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const data = new FormData(form);
  const payload = {
    name: data.get("name"),
    email: data.get("email"),
    phone: optional(data.get("phone")),
    date: data.get("date"),
    time: data.get("time"),
    notes: optional(data.get("notes")),
  };
  status.className = "";
  status.textContent = "Sending booking...";
  form.querySelector("button").disabled = true;
  try {
    const response = await fetch("/bookings", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(payload),
    });
    if (response.ok) {
      const confirmation = await response.json();
      status.className = "success";
      status.textContent = confirmation.message;
      form.reset();
    } else {
      status.className = "error";
      status.textContent = await response.text();
    }
  } catch (err) {
    status.className = "error";
    status.textContent = "Booking could not be sent: " + err;
  } finally {
    form.querySelector("button").disabled = false;
  }
});
"#;

const VITALS_SCRIPT: &str = r#"
const reportVital = (name, value, entries) => {
  const id = "v1-" + performance.timeOrigin.toFixed(0) + "-" + name;
  const body = JSON.stringify({ name, value, id, delta: value, entries });
  navigator.sendBeacon("/vitals", new Blob([body], { type: "application/json" }));
};
const toEntry = (e) => ({
  name: e.name,
  entryType: e.entryType,
  startTime: e.startTime,
  duration: e.duration,
});

new PerformanceObserver((list) => {
  for (const entry of list.getEntriesByName("first-contentful-paint")) {
    reportVital("FCP", entry.startTime, [toEntry(entry)]);
  }
}).observe({ type: "paint", buffered: true });

const [navigation] = performance.getEntriesByType("navigation");
if (navigation) {
  reportVital("TTFB", navigation.responseStart, [toEntry(navigation)]);
}
"#;

/// The form customers fill in to request a booking.
#[derive(Debug, Clone, Default)]
pub struct BookingForm;

impl BookingForm {
    pub fn render(&self) -> String {
        format!(
            r#"<form id="booking-form">
  <label>Name <input name="name" required maxlength="100"></label>
  <label>Email <input name="email" type="email" required></label>
  <label>Phone <input name="phone" type="tel"></label>
  <label>Date <input name="date" type="date" required></label>
  <label>Time <input name="time" type="time" required></label>
  <label>Notes <textarea name="notes" maxlength="1000"></textarea></label>
  <button type="submit">Book</button>
</form>
<p id="booking-status" role="status"></p>
<script type="module">{FORM_SCRIPT}</script>"#
        )
    }
}

pub fn render_page(title: &str, form: &BookingForm) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  <header><h1>{title}</h1></header>
  <main>
{form}
  </main>
  <footer>&copy; {title}</footer>
  <script type="module">{VITALS_SCRIPT}</script>
</body>
</html>
"#,
        form = form.render()
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
