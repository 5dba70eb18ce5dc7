use crate::{
    config::Config,
    editor::Editor,
    entropy::{ambient_seed, timestamp, Clock, Dice, LocalClock, SeededDice},
    freed::FreedOs,
    matrix::MatrixGame,
    profile,
    shell::Shell,
    vfs::Vfs,
};
use chrono::NaiveDateTime;

const BOOT_STEPS: &[&str] = &[
    "Initializing system...",
    "Loading kernel modules...",
    "Mounting file systems...",
    "Starting network services...",
    "Launching user interface...",
    "System ready.",
];

const WELCOME: &str = "Welcome to Ruddy's OverEngineered Terminal Portfolio. Type \"help\" for available commands. and play the game to explore the Matrix simulation.";

/// The machine behind one terminal session: filesystem, history, both games
/// and the injected sources of chance and time.
pub struct Kernel {
    pub config: Config,
    pub fs: Vfs,
    pub shell: Shell,
    pub matrix: MatrixGame,
    pub freed: FreedOs,
    /// Buffer open in `vim`, if any.
    pub editor: Option<Editor>,
    dice: Box<dyn Dice>,
    clock: Box<dyn Clock>,
    log: Vec<String>,
    boot_index: usize,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Kernel {
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(ambient_seed);
        Self::with_sources(config, Box::new(SeededDice::new(seed)), Box::new(LocalClock))
    }

    pub fn with_sources(config: Config, dice: Box<dyn Dice>, clock: Box<dyn Clock>) -> Self {
        Kernel {
            fs: Vfs::new(profile::filesystem(&config.user), config.home()),
            shell: Shell::new(),
            matrix: MatrixGame::new(),
            freed: FreedOs::new(&config.freed_user),
            editor: None,
            config,
            dice,
            clock,
            log: Vec::new(),
            boot_index: 0,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn timestamp(&self) -> String {
        timestamp(self.now())
    }

    /// Runs one Matrix command with the kernel's dice.
    pub fn matrix_turn(&mut self, input: &str) -> crate::matrix::Turn {
        self.matrix.handle(input, self.dice.as_mut())
    }

    /// Runs one Freed OS command with the kernel's dice.
    pub fn freed_turn(&mut self, input: &str) -> crate::freed::Reply {
        self.freed.handle(input, self.dice.as_mut())
    }

    pub fn generate_boot_log(&mut self) {
        if !self.log.is_empty() {
            return;
        }
        self.log.extend(BOOT_STEPS.iter().map(|s| s.to_string()));
        self.log.push(String::new());
        self.log.extend(profile::ASCII_ART.lines().map(String::from));
        self.log.push(String::new());
        self.log.push(WELCOME.into());
        log::debug!("boot log prepared, {} lines", self.log.len());
    }

    pub fn next_boot_line(&mut self) -> Option<String> {
        if self.log.is_empty() {
            self.generate_boot_log();
        }
        let line = self.log.get(self.boot_index)?.clone();
        self.boot_index += 1;
        Some(line)
    }
}

#[cfg(test)]
impl Kernel {
    /// Default config, fixed clock, dice replaying `rolls` then 0.0.
    pub fn scripted(rolls: &[f64]) -> Kernel {
        use crate::entropy::{FixedClock, ScriptedDice};
        Kernel::with_sources(
            Config::default(),
            Box::new(ScriptedDice::new(rolls)),
            Box::new(FixedClock::epoch()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_kernel() -> Kernel {
        Kernel::scripted(&[])
    }

    #[test]
    fn test_boot_log_replays_once() {
        let mut k = test_kernel();
        let mut lines = Vec::new();
        while let Some(line) = k.next_boot_line() {
            lines.push(line);
        }
        assert_eq!(lines[0], "Initializing system...");
        assert_eq!(lines[5], "System ready.");
        assert!(lines.last().is_some_and(|l| l.starts_with("Welcome to Ruddy's")));
        assert_eq!(k.next_boot_line(), None);
    }

    #[test]
    fn test_starts_in_home() {
        let k = test_kernel();
        assert_eq!(k.fs.pwd(), "/home/user");
        assert_eq!(k.timestamp(), "5/15/2024, 09:22:01");
    }
}
