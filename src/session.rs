use crate::{
    commands::Registry,
    config::Config,
    editor::EditorAction,
    freed::{FreedState, Reply},
    kernel::Kernel,
    matrix::{self, GameState, Outcome, Turn},
    output::{Mode, Output},
    shell::prompt,
};
use serde::Serialize;

const DISCONNECTED: &str =
    "The Matrix simulation has ended. You have been disconnected and returned to the real world.";
const FREED_BANNER: &str = "Freed OS 1.0\n...\nlogin: _";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStage {
    Username,
    Password,
    LoggedIn,
}

/// Read-only view of the session handed to the page.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub prompt: String,
    pub cwd: String,
    pub login: LoginStage,
    pub matrix: &'a GameState,
    pub freed: &'a FreedState,
}

/// Routes every line to whichever front end currently owns the keyboard.
pub struct Session {
    kernel: Kernel,
    registry: Registry,
    mode: Mode,
    login: LoginStage,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Session {
        Self::with_kernel(Kernel::new(config))
    }

    pub fn with_kernel(kernel: Kernel) -> Session {
        Session {
            kernel,
            registry: Registry::builtin(),
            mode: Mode::Terminal,
            login: LoginStage::Username,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
    }

    pub fn submit(&mut self, line: &str) -> Vec<Output> {
        let secret = self.mode == Mode::FreedOs && self.login == LoginStage::Password;
        if !secret && self.mode != Mode::Editor {
            self.kernel.shell.history.push(line);
        }
        if line.trim().is_empty() && self.mode != Mode::Editor {
            return Vec::new();
        }
        match self.mode {
            Mode::Terminal | Mode::Gui => self.terminal(line),
            Mode::Matrix => {
                let turn = self.kernel.matrix_turn(line);
                self.matrix_outputs(turn)
            }
            Mode::FreedOs => self.freed(line),
            Mode::Editor => self.editor(line),
        }
    }

    fn switch(&mut self, mode: Mode) -> Output {
        log::info!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
        Output::switch(mode)
    }

    fn terminal(&mut self, line: &str) -> Vec<Output> {
        if self.mode == Mode::Gui && matches!(line.trim(), "exit" | "terminal") {
            return vec![Output::text("Returning to terminal..."), self.switch(Mode::Terminal)];
        }
        match self.registry.execute(&mut self.kernel, line) {
            Output::ModeSwitch { mode: Mode::Matrix } => vec![
                Output::text(matrix::WELCOME),
                Output::text("Entering the Matrix Simulation..."),
                self.switch(Mode::Matrix),
            ],
            Output::ModeSwitch { mode: Mode::FreedOs } => {
                self.kernel.freed.reset();
                self.login = LoginStage::Username;
                vec![
                    Output::text("Initiating Freed OS kernel... Please wait."),
                    self.switch(Mode::FreedOs),
                    Output::text(FREED_BANNER),
                ]
            }
            Output::ModeSwitch { mode: Mode::Editor } => {
                let opening = match &self.kernel.editor {
                    Some(editor) => format!("Opening {} in vim...\n{}", editor.filename(), editor.render()),
                    None => return vec![Output::text("vim: no buffer")],
                };
                vec![Output::text(opening), self.switch(Mode::Editor)]
            }
            Output::ModeSwitch { mode: Mode::Gui } => {
                vec![Output::text("Switching to GUI mode..."), self.switch(Mode::Gui)]
            }
            other => vec![other],
        }
    }

    fn matrix_outputs(&mut self, turn: Turn) -> Vec<Output> {
        let mut out = vec![Output::text(turn.text)];
        if let Some(puzzle) = &turn.reveal {
            out.push(Output::Challenge(puzzle.into()));
        }
        if self.mode != Mode::Matrix {
            return out;
        }
        let farewell = match turn.outcome {
            Outcome::Continue => return out,
            Outcome::Exited => "Exiting the Matrix Simulation...",
            Outcome::Ended => DISCONNECTED,
        };
        self.kernel.matrix.reset();
        out.push(Output::text(farewell));
        out.push(self.switch(Mode::Terminal));
        out
    }

    fn freed(&mut self, line: &str) -> Vec<Output> {
        match self.login {
            LoginStage::Username => {
                self.login = LoginStage::Password;
                vec![Output::text(format!("login: {}\npassword: _", line.trim()))]
            }
            LoginStage::Password => {
                self.login = LoginStage::LoggedIn;
                let reply = self.kernel.freed_turn("login");
                self.freed_outputs(reply, &["password: ********", ""])
            }
            LoginStage::LoggedIn => {
                if line.trim().eq_ignore_ascii_case("restart") && self.kernel.freed.state().is_game_over {
                    self.kernel.freed.reset();
                    self.login = LoginStage::Username;
                    return vec![Output::Clear, Output::text(FREED_BANNER)];
                }
                let reply = self.kernel.freed_turn(line);
                self.freed_outputs(reply, &[])
            }
        }
    }

    fn freed_outputs(&mut self, reply: Reply, before: &[&str]) -> Vec<Output> {
        let mut lines: Vec<String> = before.iter().map(|s| s.to_string()).collect();
        match reply {
            Reply::Lines(l) => {
                lines.extend(l);
                vec![Output::lines(lines)]
            }
            Reply::Clear => vec![Output::Clear],
            Reply::Exit(l) => {
                lines.extend(l);
                self.kernel.freed.reset();
                self.login = LoginStage::Username;
                vec![Output::lines(lines), self.switch(Mode::Terminal)]
            }
        }
    }

    fn editor(&mut self, line: &str) -> Vec<Output> {
        let Some(editor) = self.kernel.editor.as_mut() else {
            return vec![self.switch(Mode::Terminal)];
        };
        match editor.apply(line) {
            EditorAction::Continue(msg) if msg.is_empty() => Vec::new(),
            EditorAction::Continue(msg) => vec![Output::text(msg)],
            EditorAction::Save { filename, content, quit } => {
                let now = self.kernel.now();
                if let Err(err) = self.kernel.fs.write(&filename, &content, now) {
                    return vec![Output::text(format!("E212: Can't open file for writing: {}", err))];
                }
                log::debug!("saved {} ({} bytes)", filename, content.len());
                let lines = if content.is_empty() { 0 } else { content.split('\n').count() };
                let mut out = vec![Output::text(format!(
                    "\"{}\" {}L, {}B written",
                    filename,
                    lines,
                    content.len()
                ))];
                if quit {
                    self.kernel.editor = None;
                    out.push(self.switch(Mode::Terminal));
                }
                out
            }
            EditorAction::Quit => {
                self.kernel.editor = None;
                vec![self.switch(Mode::Terminal)]
            }
        }
    }

    /// Ctrl-C.
    pub fn interrupt(&mut self) -> Vec<Output> {
        match self.mode {
            Mode::Matrix => {
                self.kernel.matrix.reset();
                vec![
                    Output::text("Game terminated. Type \"play\" to start a new game."),
                    self.switch(Mode::Terminal),
                ]
            }
            Mode::Editor => {
                self.kernel.editor = None;
                vec![Output::text("Buffer discarded."), self.switch(Mode::Terminal)]
            }
            Mode::Terminal | Mode::Gui | Mode::FreedOs => vec![Output::text("^C")],
        }
    }

    /// Answer typed into the challenge modal.
    pub fn solve_challenge(&mut self, answer: &str) -> Vec<Output> {
        if self.mode == Mode::FreedOs {
            return self.freed(&format!("solve {}", answer));
        }
        let turn = self.kernel.matrix.solve(answer);
        self.matrix_outputs(turn)
    }

    pub fn history_up(&mut self) -> Option<String> {
        self.kernel.shell.history.up().map(String::from)
    }

    pub fn history_down(&mut self) -> Option<String> {
        self.kernel.shell.history.down().map(String::from)
    }

    pub fn prompt(&self) -> String {
        match (self.mode, self.login) {
            (Mode::Matrix, _) => self.kernel.matrix.prompt(),
            (Mode::FreedOs, LoginStage::Username) => "login: ".into(),
            (Mode::FreedOs, LoginStage::Password) => "password: ".into(),
            (Mode::FreedOs, LoginStage::LoggedIn) => self.kernel.freed.prompt(),
            (Mode::Editor, _) => ":".into(),
            (Mode::Terminal | Mode::Gui, _) => prompt(&self.kernel.fs, &self.kernel.config),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            mode: self.mode,
            prompt: self.prompt(),
            cwd: self.kernel.fs.pwd(),
            login: self.login,
            matrix: self.kernel.matrix.state(),
            freed: self.kernel.freed.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Location;

    fn session(rolls: &[f64]) -> Session {
        Session::with_kernel(Kernel::scripted(rolls))
    }

    fn joined(out: &[Output]) -> String {
        out.iter()
            .filter_map(Output::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_red_pill_scenario() {
        let mut s = session(&[]);
        let out = s.submit("play");
        assert_eq!(s.mode(), Mode::Matrix);
        assert!(joined(&out).contains("Entering the Matrix Simulation..."));
        assert_eq!(s.prompt(), "matrix@construct:$ ");
        s.submit("look");
        s.submit("take red pill");

        let state = s.kernel().matrix.state();
        assert_eq!(state.location, Location::Training);
        assert_eq!(state.awareness.get(), 20);
        assert_eq!(state.health.get(), 90);
        assert_eq!(state.inventory, vec!["neural interface"]);
    }

    #[test]
    fn test_matrix_exit_returns_to_terminal() {
        let mut s = session(&[]);
        s.submit("play");
        s.submit("take red pill");
        let out = s.submit("exit");
        assert_eq!(out.last(), Some(&Output::switch(Mode::Terminal)));
        assert!(joined(&out).contains("Exiting the Matrix Simulation..."));
        assert_eq!(s.mode(), Mode::Terminal);
        assert_eq!(s.kernel().matrix.state(), &GameState::default());
        assert_eq!(s.prompt(), "user@matrix-terminal:~$ ");
    }

    #[test]
    fn test_interrupt_resets_game() {
        let mut s = session(&[]);
        s.submit("play");
        s.submit("take red pill");
        let out = s.interrupt();
        assert_eq!(joined(&out), "Game terminated. Type \"play\" to start a new game.");
        assert_eq!(s.mode(), Mode::Terminal);
        assert_eq!(s.kernel().matrix.state().location, Location::Construct);
        assert_eq!(s.interrupt(), vec![Output::text("^C")]);
    }

    #[test]
    fn test_freed_login_flow() {
        let mut s = session(&[]);
        let out = s.submit("kernel");
        assert_eq!(s.mode(), Mode::FreedOs);
        assert!(joined(&out).ends_with("login: _"));
        assert_eq!(s.prompt(), "login: ");

        assert_eq!(joined(&s.submit("neo")), "login: neo\npassword: _");
        assert_eq!(s.prompt(), "password: ");
        let out = joined(&s.submit("hunter2"));
        assert!(out.starts_with("password: ********\n\nLast login: Wed May 15 09:22:01 on tty1"));
        assert_eq!(s.prompt(), "neo@/home/neo:~$ ");
        assert!(!s.kernel().shell.history.entries().iter().any(|e| e == "hunter2"));

        let out = s.submit("exit");
        assert_eq!(out.last(), Some(&Output::switch(Mode::Terminal)));
        assert_eq!(s.mode(), Mode::Terminal);
        assert!(!s.kernel().freed.state().is_logged_in);
    }

    #[test]
    fn test_freed_restart_after_ending() {
        let mut s = session(&[]);
        for line in ["kernel", "neo", "pw", "cd /usr/src/kernel_freedom", "nano Makefile", "solve 1"] {
            s.submit(line);
        }
        assert!(joined(&s.submit("make")).contains("mass awakening"));
        assert!(joined(&s.submit("ls")).starts_with("GAME OVER"));
        let out = s.submit("restart");
        assert_eq!(out[0], Output::Clear);
        assert_eq!(s.prompt(), "login: ");
        assert_eq!(s.kernel().freed.state().freedom_choice(), None);
    }

    #[test]
    fn test_vim_session() {
        let mut s = session(&[]);
        let out = s.submit("vim todo.txt");
        assert_eq!(s.mode(), Mode::Editor);
        assert!(joined(&out).starts_with("Opening todo.txt in vim..."));
        assert!(s.submit("wake up").is_empty());
        assert!(s.submit("").is_empty());
        let out = s.submit(":wq");
        assert_eq!(joined(&out), "\"todo.txt\" 2L, 8B written");
        assert_eq!(s.mode(), Mode::Terminal);
        assert_eq!(s.kernel().fs.user_file("todo.txt"), Some("wake up\n"));
        assert_eq!(s.kernel().shell.history.entries(), ["vim todo.txt"]);
    }

    #[test]
    fn test_vim_interrupt_discards() {
        let mut s = session(&[]);
        s.submit("vim scratch");
        s.submit("draft");
        s.interrupt();
        assert_eq!(s.mode(), Mode::Terminal);
        assert!(s.kernel().editor.is_none());
        assert_eq!(s.kernel().fs.user_file("scratch"), None);
    }

    #[test]
    fn test_hack_and_solve_through_modal() {
        // success roll, coding pool, second entry
        let mut s = session(&[0.9, 0.1, 0.3]);
        s.submit("play");
        s.submit("take red pill");
        for _ in 0..7 {
            s.submit("meditate");
        }
        assert_eq!(s.kernel().matrix.state().location, Location::Matrix);
        s.submit("hack terminal");
        let out = s.submit("solve challenge");
        assert!(matches!(out.last(), Some(Output::Challenge(view)) if view.title == "Matrix Knowledge"));
        let out = s.solve_challenge(" Zion! ");
        assert!(joined(&out).starts_with("Correct!"));
        assert!(s.kernel().matrix.state().current_challenge.is_none());
    }

    #[test]
    fn test_history_recall() {
        let mut s = session(&[]);
        s.submit("pwd");
        s.submit("ls");
        assert_eq!(s.history_up().as_deref(), Some("ls"));
        assert_eq!(s.history_up().as_deref(), Some("pwd"));
        assert_eq!(s.history_down().as_deref(), Some("ls"));
        assert_eq!(s.history_down().as_deref(), Some(""));
    }

    #[test]
    fn test_gui_round_trip() {
        let mut s = session(&[]);
        s.submit("gui");
        assert_eq!(s.mode(), Mode::Gui);
        assert_eq!(joined(&s.submit("pwd")), "/home/user");
        s.submit("exit");
        assert_eq!(s.mode(), Mode::Terminal);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = session(&[]);
        s.submit("play");
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["mode"], "matrix");
        assert_eq!(json["matrix"]["location"], "construct");
        assert_eq!(json["cwd"], "/home/user");
    }
}
