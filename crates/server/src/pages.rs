//! Server-rendered pages.
//!
//! Small HTML documents sharing the SeaTrack header and footer. Styling
//! beyond document structure is out of scope.

use seatrack_common::{encode_query_value, TrackingLink};

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - SeaTrack</title>
</head>
<body>
<header><h1><a href="/">SeaTrack</a></h1></header>
<main>
{body}
</main>
<footer><p>SeaTrack Project.</p></footer>
</body>
</html>
"#
    )
}

/// Landing page with the example tracking link.
pub fn landing() -> String {
    page(
        "Object Movement Tracking",
        r#"<h2>Welcome to SeaTrack</h2>
<p>Help us understand ocean currents and track objects at sea.</p>
<p>If you've found an object with a SeaTrack QR code, please scan it to log
its current location. Your contribution is valuable to our research.</p>
<p>This application receives location data from scanned QR codes.
Example URL: <code>/log_location?id=OBJECT_ID_HERE</code></p>
<p><a href="/log_location?id=DEMO123">View Example Log Page</a></p>"#,
    )
}

/// Shown when `/log_location` is reached without an object identifier.
pub fn missing_object_id() -> String {
    page(
        "Object ID Missing",
        r#"<h2>Object ID Missing</h2>
<p>The Object ID is missing from the URL. Please scan a valid SeaTrack QR code.</p>
<p>Example: <code>/log_location?id=YOUR_OBJECT_ID</code></p>"#,
    )
}

const LOG_LOCATION_SCRIPT: &str = r#"<script>
const objectId = __OBJECT_ID__;
const statusEl = document.getElementById("status");
const button = document.getElementById("log-btn");
button.addEventListener("click", () => {
  if (!navigator.onLine) {
    statusEl.textContent = "You are offline. Please check your internet connection to log location.";
    return;
  }
  if (!navigator.geolocation) {
    statusEl.textContent = "Geolocation is not supported by your browser.";
    return;
  }
  statusEl.textContent = "Acquiring your location...";
  button.disabled = true;
  navigator.geolocation.getCurrentPosition(async (position) => {
    try {
      const response = await fetch("/api/locations", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({
          object_id: objectId,
          latitude: position.coords.latitude,
          longitude: position.coords.longitude,
          submitting_agent: navigator.userAgent,
        }),
      });
      const result = await response.json();
      statusEl.textContent = result.success
        ? "Location recorded successfully for object ID: " + objectId + ". Thank you!"
        : result.message;
    } catch (err) {
      statusEl.textContent = "Failed to submit location data. Please try again.";
    }
    button.disabled = false;
  }, (error) => {
    switch (error.code) {
      case error.PERMISSION_DENIED:
        statusEl.textContent = "Location permission denied. Please enable location services in your browser/device settings and try again.";
        break;
      case error.POSITION_UNAVAILABLE:
        statusEl.textContent = "Location information is unavailable. Please try again later or from a different location.";
        break;
      case error.TIMEOUT:
        statusEl.textContent = "The request to get your location timed out. Please try again.";
        break;
      default:
        statusEl.textContent = "An unknown error occurred while retrieving location.";
        break;
    }
    button.disabled = false;
  }, { timeout: 10000, enableHighAccuracy: true });
});
</script>"#;

/// The submission UI for one object.
pub fn log_location(object_id: &str) -> String {
    // JSON-encode the identifier for the script; `<` is escaped so the
    // literal can never close the surrounding script element.
    let json_id = serde_json::to_string(object_id)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c");

    let body = format!(
        r#"<h2>Log Object Location</h2>
<p>Thank you for helping us track items at sea. Your current location will be
recorded for the specified object ID.</p>
<p>Object ID: <strong>{id}</strong></p>
<p>Press the button below to log the current location of this object.</p>
<button id="log-btn">Log My Current Location</button>
<p id="status" role="status"></p>
{script}"#,
        id = escape_html(object_id),
        script = LOG_LOCATION_SCRIPT.replace("__OBJECT_ID__", &json_id),
    );
    page("Log Object Location", &body)
}

const DEFAULT_SECRET_WARNING: &str = r#"<p class="warning">Security warning: you are
using the default admin password. Set SEATRACK_ADMIN_PASSWORD for better security.</p>"#;

/// The admin password prompt.
pub fn admin_login(error: Option<&str>, default_secret: bool) -> String {
    let mut body = String::from(
        r#"<h2>Admin Area Access</h2>
<p>Please enter the password to proceed.</p>
"#,
    );
    if let Some(error) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }
    body.push_str(
        r#"<form method="post" action="/admin/login">
<input type="password" name="password" aria-label="Admin password" autofocus>
<button type="submit">Login</button>
</form>
"#,
    );
    if default_secret {
        body.push_str(DEFAULT_SECRET_WARNING);
    }
    page("Admin Area Access", &body)
}

const COPY_URL_SCRIPT: &str = r#"<script>
document.getElementById("copy-btn").addEventListener("click", () => {
  const copyStatus = document.getElementById("copy-status");
  navigator.clipboard.writeText(__URL__)
    .then(() => { copyStatus.textContent = "URL copied to clipboard!"; })
    .catch(() => { copyStatus.textContent = "Failed to copy URL."; });
});
</script>"#;

/// The gated QR issuance page, optionally showing an error or a freshly
/// generated link.
pub fn admin_generate(
    default_secret: bool,
    error: Option<&str>,
    link: Option<&TrackingLink>,
) -> String {
    let mut body = String::from("<h2>Generate QR Code</h2>\n");
    if default_secret {
        body.push_str(DEFAULT_SECRET_WARNING);
        body.push('\n');
    }
    body.push_str("<p>Enter an Object ID to generate a trackable QR code.</p>\n");
    if let Some(error) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }
    body.push_str(
        r#"<form method="post" action="/admin/generate-qr">
<label for="object-id">Object ID</label>
<input id="object-id" type="text" name="object_id" placeholder="e.g., buoy-001, sensor-alpha-7" required>
<button type="submit">Generate QR Code</button>
</form>
"#,
    );

    if let Some(link) = link {
        let encoded_id = encode_query_value(link.object_id().as_str());
        let json_url = serde_json::to_string(link.url())
            .unwrap_or_else(|_| "\"\"".to_string())
            .replace('<', "\\u003c");
        body.push_str(&format!(
            r#"<h3>Generated QR Code:</h3>
<img src="/admin/generate-qr/qr.png?id={encoded_id}" width="256" height="256" alt="QR code for {id}">
<p>URL: {url}</p>
<p><a href="/admin/generate-qr/qr.png?id={encoded_id}" download>Download PNG</a>
<button id="copy-btn" type="button">Copy URL</button>
<span id="copy-status" role="status"></span></p>
{script}"#,
            id = escape_html(link.object_id().as_str()),
            url = escape_html(link.url()),
            script = COPY_URL_SCRIPT.replace("__URL__", &json_url),
        ));
    }

    page("Generate QR Code", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatrack_common::{ObjectId, Origin};

    fn link(id: &str) -> TrackingLink {
        let origin = Origin::parse("https://seatrack.example").unwrap();
        TrackingLink::new(&origin, ObjectId::parse(id).unwrap())
    }

    #[test]
    fn test_landing_has_example_link() {
        let html = landing();
        assert!(html.contains("/log_location?id=DEMO123"));
        assert!(html.contains("SeaTrack"));
    }

    #[test]
    fn test_missing_object_id_page_is_descriptive() {
        let html = missing_object_id();
        assert!(html.contains("Object ID Missing"));
        assert!(html.contains("/log_location?id=YOUR_OBJECT_ID"));
    }

    #[test]
    fn test_log_location_echoes_identifier() {
        let html = log_location("buoy-007");
        assert!(html.contains("<strong>buoy-007</strong>"));
        assert!(html.contains("Log My Current Location"));
    }

    #[test]
    fn test_log_location_escapes_identifier() {
        let html = log_location("<script>alert(1)</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        // The embedded JSON literal cannot close the script element either.
        assert!(html.contains("\\u003cscript"));
    }

    #[test]
    fn test_admin_login_shows_generic_error_only_when_present() {
        let html = admin_login(None, false);
        assert!(!html.contains("class=\"error\""));

        let html = admin_login(Some("Incorrect password. Please try again."), false);
        assert!(html.contains("Incorrect password. Please try again."));
        // The prompt never pre-fills the attempt field.
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_default_secret_warning_rendering() {
        assert!(admin_login(None, true).contains("default admin password"));
        assert!(!admin_login(None, false).contains("default admin password"));
        assert!(admin_generate(true, None, None).contains("default admin password"));
        assert!(!admin_generate(false, None, None).contains("default admin password"));
    }

    #[test]
    fn test_admin_generate_shows_link_and_download() {
        let link = link("buoy 001");
        let html = admin_generate(false, None, Some(&link));
        assert!(html.contains("qr.png?id=buoy%20001"));
        assert!(html.contains("https://seatrack.example/log_location?id=buoy%20001"));
        assert!(html.contains("Download PNG"));
        assert!(html.contains("Copy URL"));
    }
}
