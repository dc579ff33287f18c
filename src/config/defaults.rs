pub(crate) fn default_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

pub(crate) fn default_request_timeout_secs() -> f32 {
    15.0
}

pub(crate) fn default_tts_model() -> String {
    "/usr/share/piper-voices/ko/ko_KR/glow/medium/ko_KR-glow-medium.onnx".to_string()
}

pub(crate) fn default_tts_espeak_path() -> String {
    "/usr/share".to_string()
}

pub(crate) fn default_tts_volume() -> f32 {
    1.0
}

pub(crate) fn default_font_size() -> u32 {
    19
}

pub(crate) fn default_line_spacing() -> f32 {
    1.6
}

pub(crate) fn default_window_width() -> f32 {
    430.0
}

pub(crate) fn default_window_height() -> f32 {
    860.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
