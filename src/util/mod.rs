pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// "HH:MM" label for the saved-at indicator (browser-local time).
pub(crate) fn format_clock_time(ms: i64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    format!("{:02}:{:02}", d.get_hours(), d.get_minutes())
}
