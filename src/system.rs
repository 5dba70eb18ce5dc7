use crate::{config::Config, console, output::Output, session::Session};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to encode output: {}", err);
        "[]".into()
    })
}

/// Entry point for the page. Every command returns a JSON array of tagged
/// outputs (`{"kind": "text", "text": ...}`).
#[wasm_bindgen]
pub struct System {
    session: Session,
    booted: bool,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl System {
    #[wasm_bindgen(constructor)]
    pub fn new() -> System {
        console::init();
        System {
            session: Session::new(Config::default()),
            booted: false,
        }
    }

    /// Builds a session from a JSON config; falls back to defaults when the
    /// config does not parse.
    #[wasm_bindgen]
    pub fn with_config(json: &str) -> System {
        console::init();
        let config = Config::from_json(json).unwrap_or_else(|err| {
            log::warn!("{}; using defaults", err);
            Config::default()
        });
        System {
            session: Session::new(config),
            booted: false,
        }
    }

    #[wasm_bindgen]
    pub fn next_boot_line(&mut self) -> Option<String> {
        let line = self.session.kernel_mut().next_boot_line();
        if line.is_none() {
            self.booted = true;
        }
        line
    }

    #[wasm_bindgen]
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) -> String {
        to_json(&self.session.submit(line))
    }

    #[wasm_bindgen]
    pub fn interrupt(&mut self) -> String {
        to_json(&self.session.interrupt())
    }

    #[wasm_bindgen]
    pub fn solve_challenge(&mut self, answer: &str) -> String {
        to_json(&self.session.solve_challenge(answer))
    }

    #[wasm_bindgen]
    pub fn history_up(&mut self) -> Option<String> {
        self.session.history_up()
    }

    #[wasm_bindgen]
    pub fn history_down(&mut self) -> Option<String> {
        self.session.history_down()
    }

    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        self.session.mode().to_string()
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> String {
        to_json(&self.session.snapshot())
    }
}

impl System {
    /// Native callers get the outputs without the JSON round trip.
    pub fn submit(&mut self, line: &str) -> Vec<Output> {
        self.session.submit(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_returns_tagged_json() {
        let mut sys = System::with_config(r#"{"seed": 7}"#);
        let json: serde_json::Value = serde_json::from_str(&sys.exec("echo hello")).unwrap();
        assert_eq!(json, serde_json::json!([{"kind": "text", "text": "hello"}]));
        assert_eq!(sys.exec("   "), "[]");
    }

    #[test]
    fn test_mode_switch_is_reported() {
        let mut sys = System::with_config("{}");
        let json: serde_json::Value = serde_json::from_str(&sys.exec("kernel")).unwrap();
        assert_eq!(json[1], serde_json::json!({"kind": "mode_switch", "mode": "freed_os"}));
        assert_eq!(sys.mode(), "freed_os");
        assert_eq!(sys.prompt(), "login: ");
    }

    #[test]
    fn test_bad_config_falls_back() {
        let sys = System::with_config(r#"{"user": ""}"#);
        assert_eq!(sys.prompt(), "user@matrix-terminal:~$ ");
        let sys = System::with_config(r#"{"user": "trinity", "hostname": "nebuchadnezzar"}"#);
        assert_eq!(sys.prompt(), "trinity@nebuchadnezzar:~$ ");
    }

    #[test]
    fn test_boot_then_booted() {
        let mut sys = System::new();
        assert!(!sys.is_booted());
        while sys.next_boot_line().is_some() {}
        assert!(sys.is_booted());
    }

    #[test]
    fn test_url_output_is_not_opened_by_core() {
        let mut sys = System::new();
        let out = sys.submit("telegram");
        assert!(matches!(&out[0], Output::OpenUrl { url, .. } if url == "https://t.me/That_guy_Rudransh"));
    }
}
