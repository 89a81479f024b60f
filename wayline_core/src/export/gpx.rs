use jiff::Timestamp;

use crate::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};

/// Serializes the waypoints, in their given working order, as a GPX 1.1
/// document. Returns `None` below two waypoints (export precondition).
///
/// Text content is XML-escaped before being embedded; unescaped labels
/// would produce an invalid document.
pub fn write_gpx(name: &str, waypoints: &[Waypoint], timestamp: Timestamp) -> Option<String> {
    if waypoints.len() < MIN_ROUTE_WAYPOINTS {
        return None;
    }

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<gpx version=\"1.1\" creator=\"wayline\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
    );
    out.push_str("  <metadata>\n");
    out.push_str(&format!("    <name>{}</name>\n", escape_xml(name)));
    out.push_str(&format!("    <time>{timestamp}</time>\n"));
    out.push_str("  </metadata>\n");

    for waypoint in waypoints {
        out.push_str(&format!(
            "  <wpt lat=\"{}\" lon=\"{}\">\n",
            waypoint.position.lat, waypoint.position.lng
        ));
        out.push_str(&format!(
            "    <name>{}</name>\n",
            escape_xml(&waypoint.label)
        ));
        out.push_str("  </wpt>\n");
    }

    out.push_str("</gpx>\n");
    Some(out)
}

/// Escapes element text content. Quotes are legal in text and stay as-is;
/// only attribute values would need `&quot;`/`&apos;`, and the attributes
/// written here are numeric coordinates.
fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
