//! User-agent parsing.
//!
//! Token scanning over the UA string, good enough to name the browser,
//! rendering engine, OS, and device class of mainstream browsers. Anything
//! not recognized stays `None` and the snapshot substitutes its fallback.

/// Parsed view of a user-agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
    pub engine: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub device_type: Option<String>,
    pub device_vendor: Option<String>,
    pub device_model: Option<String>,
}

impl UserAgentInfo {
    pub fn parse(ua: &str) -> Self {
        let (browser_name, browser_version) = match parse_browser(ua) {
            Some((name, version)) => (Some(name.to_string()), version),
            None => (None, None),
        };
        let (os_name, os_version) = match parse_os(ua) {
            Some((name, version)) => (Some(name.to_string()), version),
            None => (None, None),
        };
        let device = parse_device(ua);

        Self {
            browser_name,
            browser_version,
            engine: parse_engine(ua).map(str::to_string),
            os_name,
            os_version,
            device_type: device.kind.map(str::to_string),
            device_vendor: device.vendor.map(str::to_string),
            device_model: device.model,
        }
    }
}

/// Version digits immediately following `token`, e.g. `"Firefox/"`.
fn version_after(ua: &str, token: &str) -> Option<String> {
    let start = ua.find(token)? + token.len();
    let version: String = ua[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '_')
        .map(|c| if c == '_' { '.' } else { c })
        .collect();
    let version = version.trim_end_matches('.');
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

fn parse_browser(ua: &str) -> Option<(&'static str, Option<String>)> {
    // Order matters: most derived browsers also carry Chrome/ and Safari/.
    const TOKENS: &[(&str, &str)] = &[
        ("EdgiOS/", "Edge"),
        ("EdgA/", "Edge"),
        ("Edg/", "Edge"),
        ("Edge/", "Edge"),
        ("OPR/", "Opera"),
        ("SamsungBrowser/", "Samsung Internet"),
        ("YaBrowser/", "Yandex"),
        ("Vivaldi/", "Vivaldi"),
        ("FxiOS/", "Firefox"),
        ("CriOS/", "Chrome"),
        ("Firefox/", "Firefox"),
        ("Chromium/", "Chromium"),
        ("Chrome/", "Chrome"),
        ("MSIE ", "IE"),
    ];

    for (token, name) in TOKENS {
        if ua.contains(token) {
            return Some((name, version_after(ua, token)));
        }
    }
    if ua.contains("Trident/") {
        return Some(("IE", version_after(ua, "rv:")));
    }
    if ua.contains("Opera") {
        return Some(("Opera", version_after(ua, "Version/")));
    }
    if ua.contains("Safari/") {
        let name = if ua.contains("Mobile") { "Mobile Safari" } else { "Safari" };
        return Some((name, version_after(ua, "Version/")));
    }
    None
}

fn parse_engine(ua: &str) -> Option<&'static str> {
    if ua.contains("Trident/") || ua.contains("MSIE ") {
        Some("Trident")
    } else if ua.contains("Edge/") {
        Some("EdgeHTML")
    } else if ua.contains("Presto/") {
        Some("Presto")
    } else if is_ios(ua) && ua.contains("AppleWebKit/") {
        // Every iOS browser is WebKit underneath.
        Some("WebKit")
    } else if ua.contains("AppleWebKit/") && (ua.contains("Chrome/") || ua.contains("Chromium/")) {
        Some("Blink")
    } else if ua.contains("AppleWebKit/") {
        Some("WebKit")
    } else if ua.contains("Gecko/") {
        Some("Gecko")
    } else {
        None
    }
}

fn is_ios(ua: &str) -> bool {
    ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod")
}

fn windows_release(nt: &str) -> String {
    match nt {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.2" | "5.1" => "XP",
        other => other,
    }
    .to_string()
}

fn parse_os(ua: &str) -> Option<(&'static str, Option<String>)> {
    if ua.contains("Windows Phone") {
        return Some(("Windows Phone", version_after(ua, "Windows Phone ")));
    }
    if ua.contains("Windows") {
        let version = version_after(ua, "Windows NT ").map(|nt| windows_release(&nt));
        return Some(("Windows", version));
    }
    if is_ios(ua) {
        let version = version_after(ua, "iPhone OS ").or_else(|| version_after(ua, "CPU OS "));
        return Some(("iOS", version));
    }
    if ua.contains("Android") {
        return Some(("Android", version_after(ua, "Android ")));
    }
    if ua.contains("CrOS") {
        return Some(("Chrome OS", None));
    }
    if ua.contains("Mac OS X") {
        return Some(("macOS", version_after(ua, "Mac OS X ")));
    }
    if ua.contains("Ubuntu") {
        return Some(("Ubuntu", version_after(ua, "Ubuntu/")));
    }
    if ua.contains("Linux") || ua.contains("X11") {
        return Some(("Linux", None));
    }
    None
}

struct DeviceGuess {
    kind: Option<&'static str>,
    vendor: Option<&'static str>,
    model: Option<String>,
}

/// The last `;`-separated segment of the first parenthesized block, with any
/// ` Build/...` suffix removed. On Android this is the handset model.
fn android_model(ua: &str) -> Option<String> {
    let open = ua.find('(')?;
    let close = open + ua[open..].find(')')?;
    let segment = ua[open + 1..close].rsplit(';').next()?.trim();
    let segment = segment.split(" Build/").next().unwrap_or(segment).trim();
    if segment.is_empty() || segment.starts_with("Android") || segment == "Linux" {
        None
    } else {
        Some(segment.to_string())
    }
}

fn android_vendor(model: &str) -> Option<&'static str> {
    const PREFIXES: &[(&str, &str)] = &[
        ("SM-", "Samsung"),
        ("GT-", "Samsung"),
        ("Pixel", "Google"),
        ("Nexus", "Google"),
        ("Redmi", "Xiaomi"),
        ("Mi ", "Xiaomi"),
        ("moto", "Motorola"),
        ("ONEPLUS", "OnePlus"),
        ("CPH", "OPPO"),
        ("HUAWEI", "Huawei"),
        ("LM-", "LG"),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
        .map(|(_, vendor)| *vendor)
}

fn parse_device(ua: &str) -> DeviceGuess {
    let guess = |kind, vendor, model: &str| DeviceGuess {
        kind,
        vendor,
        model: Some(model.to_string()),
    };

    if ua.contains("iPad") {
        return guess(Some("tablet"), Some("Apple"), "iPad");
    }
    if ua.contains("iPhone") {
        return guess(Some("mobile"), Some("Apple"), "iPhone");
    }
    if ua.contains("iPod") {
        return guess(Some("mobile"), Some("Apple"), "iPod touch");
    }
    if ua.contains("PlayStation") {
        return guess(Some("console"), Some("Sony"), "PlayStation");
    }
    if ua.contains("Xbox") {
        return guess(Some("console"), Some("Microsoft"), "Xbox");
    }
    if ua.contains("Nintendo") {
        return guess(Some("console"), Some("Nintendo"), "Switch");
    }
    if ua.contains("SmartTV") || ua.contains("SMART-TV") || (ua.contains("Tizen") && ua.contains("TV")) {
        return DeviceGuess { kind: Some("smarttv"), vendor: None, model: None };
    }
    if ua.contains("Android") {
        let model = android_model(ua);
        let vendor = model.as_deref().and_then(android_vendor);
        let kind = if ua.contains("Watch") {
            "wearable"
        } else if ua.contains("Mobile") {
            "mobile"
        } else {
            "tablet"
        };
        return DeviceGuess { kind: Some(kind), vendor, model };
    }
    if ua.contains("Macintosh") {
        return guess(None, Some("Apple"), "Macintosh");
    }
    DeviceGuess { kind: None, vendor: None, model: None }
}
