use crate::challenge;
use crate::entropy::Dice;
use crate::meter::Meter;
use crate::vfs::{display, Node, Vfs};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use std::fmt;

const README: &str = "============================================================
              Welcome to Freed OS 1.0
============================================================
This system is unlike normal Linux. If you are reading this,
you may sense illusions within the code itself.

\"The mind sees what it chooses to see.\"
============================================================";

const MESSAGES: &str = "SYNAPSE:
Neo, if you are reading this, check /var/log/dmesg for anomalies.
We suspect /dev/nullmatrix leads to the Freed Construct.

We must be quick. The Agents are always watching...";

const DMESG: &str = "[    2.34512 ] Freed OS kernel loaded.
[    2.34678 ] ANOMALY: device /dev/nullmatrix connected
[    2.40012 ] Freed OS stable...";

const AGENT_WARNINGS: &str = "WARN  heartbeat from sector 7 delayed
AGENT_TRAFFIC detected at 02:14:33
ENCRYPTED MESSAGE: 0x4D6173746572204B6579
WARN  unregistered device on /dev";

const MAKEFILE: &str = "FREEDOM_CHOICE = ?

# 1 -> Hard reboot (mass awakening)
# 0 -> Covert infiltration (maintain OS, free minds gradually)";

const KERNEL_DIR: &[&str] = &["usr", "src", "kernel_freedom"];

/// Objectives grouped by stage. Story progress counts completed entries.
pub const ROADMAP: &[&[&str]] = &[
    &["Log in to Freed OS"],
    &["Read the README file", "Discover messages from Synapse"],
    &["Connect to the Null Matrix", "Complete Freed Training"],
    &["Neutralize Agent processes", "Consult the Oracle of Blocks"],
    &["Make the final choice in Kernel Freedom"],
];

const EDIT_MAKEFILE: &str = "Edit the Makefile";
const TRAINING: &str = "Complete Freed Training";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Login,
    Construct,
    Path(Vec<String>),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Login => f.write_str("login"),
            Location::Construct => f.write_str("construct"),
            Location::Path(p) => f.write_str(&display(p)),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreedomChoice {
    Infiltrate = 0,
    Awaken = 1,
}

impl FreedomChoice {
    fn parse(arg: &str) -> Option<FreedomChoice> {
        match arg {
            "0" => Some(FreedomChoice::Infiltrate),
            "1" => Some(FreedomChoice::Awaken),
            _ => None,
        }
    }

    fn digit(self) -> u8 {
        self as u8
    }

    fn ending(self) -> &'static str {
        match self {
            FreedomChoice::Awaken => "FREEDOM_CHOICE=1: Hard reboot. Every shell on Freed OS wakes at once. The mass awakening has begun, and no mind will sleep in the Matrix again.",
            FreedomChoice::Infiltrate => "FREEDOM_CHOICE=0: The kernel runs silent. Through covert infiltration you will free minds one process at a time, unseen by the Agents.",
        }
    }
}

impl Serialize for FreedomChoice {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.digit())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreedPuzzle {
    pub command: &'static str,
    pub description: String,
    #[serde(skip)]
    pub solution: &'static str,
}

impl FreedPuzzle {
    fn is_training(&self) -> bool {
        matches!(self.command, "decrypt" | "hack system" | "solve turing")
    }
}

fn training_pool() -> [FreedPuzzle; 3] {
    [
        FreedPuzzle {
            command: "decrypt",
            description: format!("Decrypt base64: \"{}\"", STANDARD.encode("There is no spoon.")),
            solution: "There is no spoon.",
        },
        FreedPuzzle {
            command: "hack system",
            description: "To hack the Freed mainframe, type \"hack system\".".into(),
            solution: "hack system",
        },
        FreedPuzzle {
            command: "solve turing",
            description: "Tape: \"101001\". Move head to final \"1\". Provide L/R, e.g. \"RRLLLR\".".into(),
            solution: "RRLLLR",
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreedState {
    pub stage: usize,
    pub current_location: Location,
    pub inventory: Vec<String>,
    pub completed_objectives: Vec<String>,
    pub objectives: Vec<String>,
    pub health: Meter,
    pub knowledge: Meter,
    pub current_challenge: Option<FreedPuzzle>,
    pub story_progress: usize,
    pub is_logged_in: bool,
    pub completed_commands: Vec<String>,
    pub is_game_over: bool,
    freedom_choice: Option<FreedomChoice>,
}

impl Default for FreedState {
    fn default() -> Self {
        FreedState {
            stage: 0,
            current_location: Location::Login,
            inventory: Vec::new(),
            completed_objectives: Vec::new(),
            objectives: ROADMAP.iter().flat_map(|s| s.iter().map(|o| o.to_string())).collect(),
            health: Meter::full(),
            knowledge: Meter::new(0),
            current_challenge: None,
            story_progress: 0,
            is_logged_in: false,
            completed_commands: Vec::new(),
            is_game_over: false,
            freedom_choice: None,
        }
    }
}

impl FreedState {
    pub fn freedom_choice(&self) -> Option<FreedomChoice> {
        self.freedom_choice
    }

    /// First call wins; returns whether the choice was taken.
    fn lock_choice(&mut self, choice: FreedomChoice) -> bool {
        if self.freedom_choice.is_some() {
            return false;
        }
        self.freedom_choice = Some(choice);
        true
    }

    fn has(&self, objective: &str) -> bool {
        self.completed_objectives.iter().any(|o| o == objective)
    }

    fn next_objective(&self) -> Option<&str> {
        self.objectives
            .iter()
            .find(|o| !self.has(o))
            .map(String::as_str)
    }

    /// Records `objective` once. Returns the completion banner only the
    /// first time.
    fn complete(&mut self, objective: &str) -> Vec<String> {
        if self.has(objective) {
            return Vec::new();
        }
        self.completed_objectives.push(objective.into());
        let mut lines = vec![format!("(Objective completed: {})", objective)];
        if self.objectives.iter().any(|o| o == objective) {
            self.story_progress = (self.story_progress + 1).min(self.objectives.len());
            self.stage = ROADMAP
                .iter()
                .position(|stage| stage.iter().any(|o| !self.has(o)))
                .unwrap_or(ROADMAP.len() - 1);
            lines.push(format!(
                "Story Progress: {} / {}",
                self.story_progress,
                self.objectives.len()
            ));
            lines.push(match self.next_objective() {
                Some(next) => format!("Next Objective: {}", next),
                None => "You've reached the end of the current storyline.".into(),
            });
        }
        log::debug!("freed objective completed: {}", objective);
        lines
    }
}

pub fn filesystem(user: &str) -> Node {
    let secrets = format!(
        "// Freed OS secrets.\n// {}",
        STANDARD.encode("The Oracle of Blocks answers to 'simulate blockchain'.")
    );
    Node::dir()
        .with(
            "home",
            Node::dir().with(
                user,
                Node::dir()
                    .with("README", Node::file(README))
                    .with("messages", Node::file(MESSAGES))
                    .with("secrets", Node::file(&secrets)),
            ),
        )
        .with("dev", Node::dir().with("nullmatrix", Node::file("")))
        .with(
            "etc",
            Node::dir().with(
                "agent_config",
                Node::dir().with("watchlist", Node::file("WATCHLIST\n- neo\n- trinity\n- morpheus")),
            ),
        )
        .with(
            "var",
            Node::dir().with(
                "log",
                Node::dir()
                    .with("system.log", Node::file("Freed OS boot sequence nominal."))
                    .with("agent_warnings", Node::file(AGENT_WARNINGS))
                    .with("dmesg", Node::file(DMESG)),
            ),
        )
        .with(
            "usr",
            Node::dir().with(
                "src",
                Node::dir().with("kernel_freedom", Node::dir().with("Makefile", Node::file(MAKEFILE))),
            ),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    Clear,
    /// Leave Freed OS after printing these lines.
    Exit(Vec<String>),
}

fn lines<const N: usize>(items: [&str; N]) -> Reply {
    Reply::Lines(items.iter().map(|s| s.to_string()).collect())
}

pub struct FreedOs {
    state: FreedState,
    user: String,
    fs: Vfs,
}

impl FreedOs {
    pub fn new(user: &str) -> FreedOs {
        FreedOs {
            state: FreedState::default(),
            user: user.to_string(),
            fs: Vfs::new(filesystem(user), vec!["home".into(), user.to_string()]),
        }
    }

    pub fn state(&self) -> &FreedState {
        &self.state
    }

    pub fn reset(&mut self) {
        *self = FreedOs::new(&self.user);
    }

    pub fn prompt(&self) -> String {
        format!("{}@{}:~$ ", self.user, self.state.current_location)
    }

    pub fn handle(&mut self, input: &str, dice: &mut dyn Dice) -> Reply {
        let normalized = input
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let mut words = input.split_whitespace();
        let action = words.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = words.collect();

        if self.state.completed_commands.contains(&normalized) {
            return lines(["You've already completed this step. Move on to the next command."]);
        }
        if !self.state.is_logged_in && action != "login" {
            return lines(["Please log in first. Type 'login' to begin."]);
        }
        if self.state.is_game_over && !matches!(action.as_str(), "status" | "help" | "clear" | "exit") {
            return lines(["GAME OVER: Freed OS story concluded. Type 'restart' to begin again or 'exit' to leave."]);
        }

        match action.as_str() {
            "login" => self.login(),
            "help" => help(),
            "look" => self.look(),
            "cd" => self.cd(args.first().copied()),
            "ls" => self.ls(args.first().copied()),
            "cat" => self.cat(&args.join(" ")),
            "connect" => self.connect(&args.join(" ")),
            "train" => self.train(dice),
            "kill" => self.kill(&args.join(" ")),
            "grep" => self.grep(&args),
            "nano" => self.nano(&args.join(" ")),
            "make" => self.make(),
            "status" => self.status(),
            "inventory" => self.inventory(),
            "use" => self.use_item(&args.join(" ")),
            "talk" => talk(&args.join(" ")),
            "solve" => self.solve(&args.join(" ")),
            "hint" => self.hint(),
            "close" => {
                self.state.current_challenge = None;
                lines(["Challenge closed."])
            }
            "simulate" => self.simulate(),
            "base64" => base64_cmd(&args),
            "exit" => Reply::Exit(vec!["Exiting Freed OS simulation...".into()]),
            "clear" => Reply::Clear,
            _ => lines(["Command not recognized. Type 'help' for a list of available commands."]),
        }
    }

    fn here(&self) -> String {
        self.state.current_location.to_string()
    }

    fn login(&mut self) -> Reply {
        self.state.is_logged_in = true;
        self.state.current_location = Location::Path(self.fs.home().to_vec());
        self.state.completed_commands.push("login".into());
        log::info!("freed os login as {}", self.user);
        let mut out: Vec<String> = vec![
            "Last login: Wed May 15 09:22:01 on tty1".into(),
            "SYNAPSE: \"Welcome, Neo. Have you ever questioned the nature of your reality?\"".into(),
            "Type 'help' if you need to see what commands are available.".into(),
            String::new(),
        ];
        out.extend(self.state.complete("Log in to Freed OS"));
        Reply::Lines(out)
    }

    fn look(&self) -> Reply {
        let text = match &self.state.current_location {
            Location::Construct => "You're in the Freed Construct. CipherKey, FlowState watch you train.",
            Location::Path(p) if p.as_slice() == self.fs.home() => {
                "You're in Neo's home directory. Files: README, messages, secrets."
            }
            Location::Path(p) => match display(p).as_str() {
                "/dev" => "A device directory containing 'nullmatrix'... suspicious.",
                "/etc/agent_config" => "Agent config directory. There's a watchlist file here.",
                "/var/log" => "System logs. Could check agent_warnings or dmesg files.",
                "/usr/src/kernel_freedom" => "Kernel directory with Makefile for Freed OS choice.",
                _ => "It's an unknown path in Freed OS. The Matrix is silent... for now.",
            },
            Location::Login => "Nothing but a login prompt.",
        };
        lines([text])
    }

    fn cd(&mut self, dir: Option<&str>) -> Reply {
        let dir = dir.unwrap_or("~");
        match self.fs.cd(dir) {
            Ok(()) => {
                self.state.current_location = Location::Path(self.fs.cwd.clone());
                let mut out = vec![format!("Changed directory to {}", self.fs.pwd())];
                if self.in_kernel_dir() && !self.state.has(EDIT_MAKEFILE) {
                    out.extend([
                        String::new(),
                        "SYNAPSE: \"You've reached a crucial point, Neo. Use 'nano Makefile' to make your final choice.\"".into(),
                        "SYNAPSE: \"Then use 'make' to compile and install the Freed Kernel.\"".into(),
                    ]);
                }
                Reply::Lines(out)
            }
            Err(err) => Reply::Lines(vec![format!("cd: {}: {}", dir, err)]),
        }
    }

    fn ls(&self, dir: Option<&str>) -> Reply {
        let path = match (dir, &self.state.current_location) {
            (Some(dir), _) => self.fs.resolve_path(dir),
            (None, Location::Path(p)) => p.clone(),
            (None, _) => return lines(["No files found in this directory."]),
        };
        match self.fs.list(&path) {
            Ok(entries) if entries.is_empty() => lines(["No files found in this directory."]),
            Ok(entries) => Reply::Lines(vec![entries
                .into_iter()
                .map(|e| e.name)
                .collect::<Vec<_>>()
                .join("  ")]),
            Err(err) => Reply::Lines(vec![format!("ls: {}", err)]),
        }
    }

    fn cat(&mut self, file: &str) -> Reply {
        if file.is_empty() {
            return lines(["Usage: cat [file]"]);
        }
        let wanted = self.fs.resolve_path(file);
        let Some(path) = self.fs.find_relaxed(&wanted) else {
            return Reply::Lines(vec![format!("cat: {}: No such file or directory", file)]);
        };
        let content = match self.fs.read(&path) {
            Ok(content) => content,
            Err(_) => return Reply::Lines(vec![format!("cat: {}: Is a directory", file)]),
        };
        let mut out: Vec<String> = content.lines().map(String::from).collect();
        if out.is_empty() {
            out.push(format!("{} is empty. Nothing but static.", display(&path)));
        }
        let objective = match path.split_last() {
            Some((name, parent)) if parent == self.fs.home() && name == "README" => Some("Read the README file"),
            Some((name, parent)) if parent == self.fs.home() && name == "messages" => {
                Some("Discover messages from Synapse")
            }
            _ => None,
        };
        if let Some(objective) = objective {
            let done = self.state.complete(objective);
            if !done.is_empty() {
                out.push(String::new());
                out.extend(done);
            }
        }
        Reply::Lines(out)
    }

    fn connect(&mut self, device: &str) -> Reply {
        if device.is_empty() || display(&self.fs.resolve_path(device)) != "/dev/nullmatrix" {
            return lines(["Cannot connect to the specified device."]);
        }
        self.state.current_location = Location::Construct;
        let done = self.state.complete("Connect to the Null Matrix");
        if done.is_empty() {
            return lines(["Connected to the Freed Construct again."]);
        }
        self.state.inventory.push("construct_access".into());
        let mut out = vec!["Connected to the Null Matrix. You're in the Freed Construct.".to_string()];
        out.extend(done);
        out.push(String::new());
        out.push("SYNAPSE: \"Welcome, Neo. Let's begin your real training...\"".into());
        Reply::Lines(out)
    }

    fn train(&mut self, dice: &mut dyn Dice) -> Reply {
        if self.state.current_location != Location::Construct {
            return lines(["There is nothing to train against here. Connect to /dev/nullmatrix first."]);
        }
        let pool = training_pool();
        let puzzle = pool[dice.pick(pool.len())].clone();
        let mut out = vec![format!("New challenge started: {}", puzzle.description)];
        if !self.state.has(TRAINING) {
            out.push("SYNAPSE: \"Your first training session begins, Neo.\"".into());
        }
        self.state.current_challenge = Some(puzzle);
        Reply::Lines(out)
    }

    fn kill(&mut self, process: &str) -> Reply {
        if !process.to_lowercase().contains("agentsmith") {
            return lines(["No such process. Possibly 'kill AgentSmith'?"]);
        }
        let done = self.state.complete("Neutralize Agent processes");
        let mut out = vec!["AgentSmith process terminated successfully.".to_string()];
        if !done.is_empty() {
            out.extend(done);
            out.push(String::new());
            out.push("SYNAPSE: \"Well done. But be cautious, the Agents adapt.\"".into());
        }
        Reply::Lines(out)
    }

    fn grep(&self, args: &[&str]) -> Reply {
        let [pattern, file] = args else {
            return lines(["Usage: grep [pattern] [file]"]);
        };
        let pattern = pattern.trim_matches(['\'', '"']).to_lowercase();
        let path = self.fs.resolve_path(file);
        let Ok(content) = self.fs.read(&path) else {
            return Reply::Lines(vec![format!("grep: {}: No such file or directory", file)]);
        };
        let mut out: Vec<String> = content
            .lines()
            .filter(|l| l.to_lowercase().contains(&pattern))
            .map(String::from)
            .collect();
        if out.is_empty() {
            return lines(["No matches found."]);
        }
        if display(&path) == "/var/log/agent_warnings" {
            out.push(String::new());
            out.push("SYNAPSE: \"Important logs found. Keep going, Neo.\"".into());
        }
        Reply::Lines(out)
    }

    fn in_kernel_dir(&self) -> bool {
        matches!(&self.state.current_location, Location::Path(p) if p.iter().map(String::as_str).eq(KERNEL_DIR.iter().copied()))
    }

    fn nano(&mut self, file: &str) -> Reply {
        if !file.eq_ignore_ascii_case("makefile") || !self.in_kernel_dir() {
            return lines(["File not found or permission denied."]);
        }
        if let Some(choice) = self.state.freedom_choice {
            return Reply::Lines(vec![format!(
                "Makefile is read-only. FREEDOM_CHOICE = {} has already been written.",
                choice.digit()
            )]);
        }
        self.state.current_challenge = Some(FreedPuzzle {
            command: "edit",
            description: "Edit the Makefile: Set FREEDOM_CHOICE to 1 for mass awakening, 0 for stealth infiltration.".into(),
            solution: "",
        });
        let mut out = vec!["Makefile opened for editing. Current content:".to_string(), String::new()];
        out.extend(MAKEFILE.lines().map(String::from));
        out.push(String::new());
        out.push("Use 'solve 1' or 'solve 0' to set FREEDOM_CHOICE.".into());
        Reply::Lines(out)
    }

    fn make(&mut self) -> Reply {
        if !self.in_kernel_dir() {
            return lines(["Cannot run 'make' here. Try '/usr/src/kernel_freedom'."]);
        }
        let Some(choice) = self.state.freedom_choice.filter(|_| self.state.has(EDIT_MAKEFILE)) else {
            return lines(["You must edit the Makefile first. (Use 'nano Makefile') Then solve 1 or 0."]);
        };
        self.state.is_game_over = true;
        self.state.completed_commands.push("make".into());
        log::info!("freed kernel compiled with FREEDOM_CHOICE={}", choice.digit());
        let mut out = vec![
            "Compiling Freed Kernel...".to_string(),
            "Installation complete.".into(),
            choice.ending().into(),
        ];
        out.extend(self.state.complete("Make the final choice in Kernel Freedom"));
        out.push("GAME OVER: Freed OS storyline complete.".into());
        out.push("Type 'exit' to leave the simulation.".into());
        Reply::Lines(out)
    }

    fn status(&self) -> Reply {
        let s = &self.state;
        let or_none = |v: Vec<&str>| {
            if v.is_empty() {
                "(none)".to_string()
            } else {
                v.join(", ")
            }
        };
        let pending: Vec<&str> = s
            .objectives
            .iter()
            .filter(|o| !s.has(o))
            .map(String::as_str)
            .collect();
        let mut out = vec![
            format!("Stage: {}", s.stage),
            format!("Location: {}", self.here()),
            format!("Health: {}", s.health),
            format!("Knowledge: {}", s.knowledge),
            format!(
                "Completed Objectives: {}",
                or_none(s.completed_objectives.iter().map(String::as_str).collect())
            ),
            format!("Current Objectives: {}", or_none(pending)),
            format!("Story Progress: {} / {}", s.story_progress, s.objectives.len()),
        ];
        if s.is_game_over {
            out.push("GAME OVER: Freed OS story concluded. Type 'exit' to leave.".into());
        }
        Reply::Lines(out)
    }

    fn inventory(&self) -> Reply {
        if self.state.inventory.is_empty() {
            return lines(["Your inventory is empty."]);
        }
        Reply::Lines(vec![format!("Inventory: {}", self.state.inventory.join(", "))])
    }

    fn use_item(&self, item: &str) -> Reply {
        if self.state.inventory.iter().any(|i| i == item) {
            Reply::Lines(vec![format!("You used {}.", item)])
        } else {
            lines(["You don't have that item."])
        }
    }

    fn solve(&mut self, answer: &str) -> Reply {
        let choice = FreedomChoice::parse(answer);
        if let (Some(_), Some(locked)) = (choice, self.state.freedom_choice) {
            return Reply::Lines(vec![format!(
                "FREEDOM_CHOICE is already set to {}. The choice cannot be undone.",
                locked.digit()
            )]);
        }
        let Some(puzzle) = self.state.current_challenge.clone() else {
            return lines(["No active challenge to solve."]);
        };

        if puzzle.command == "edit" {
            let Some(choice) = choice else {
                return lines(["Invalid choice. Use 'solve 1' for mass awakening or 'solve 0' for gradual infiltration."]);
            };
            self.state.lock_choice(choice);
            self.state.current_challenge = None;
            let mut out = vec![
                format!("Makefile updated. FREEDOM_CHOICE set to {}.", choice.digit()),
                "Use 'make' to compile and install the Freed Kernel.".into(),
            ];
            out.extend(self.state.complete(EDIT_MAKEFILE));
            return Reply::Lines(out);
        }

        if !challenge::check(answer, puzzle.solution) {
            return lines(["Incorrect solution. Try again or 'hint' for a clue."]);
        }
        self.state.current_challenge = None;
        self.state.knowledge.raise(10);
        if puzzle.is_training() && !self.state.has(TRAINING) {
            let mut out = vec!["Correct! Freed training puzzle solved.".to_string(), "Knowledge +10%.".into()];
            out.extend(self.state.complete(TRAINING));
            out.push("SYNAPSE: \"You're stronger now. Continue your path...\"".into());
            Reply::Lines(out)
        } else if puzzle.command == "mine block" {
            self.state.inventory.push("oracle_token".into());
            lines([
                "Correct! Blockchain puzzle solved. Knowledge +10%.",
                "SYNAPSE: \"The Oracle trusts you. Move on to the kernel...\"",
            ])
        } else {
            lines(["Puzzle solved. Knowledge +10%."])
        }
    }

    fn hint(&self) -> Reply {
        match &self.state.current_challenge {
            Some(p) => Reply::Lines(vec![format!("Hint: {}", p.description)]),
            None => lines(["No puzzle active. 'train' or 'simulate' to start one?"]),
        }
    }

    fn simulate(&mut self) -> Reply {
        let done = self.state.complete("Consult the Oracle of Blocks");
        if done.is_empty() {
            return lines(["No blockchain puzzle available."]);
        }
        self.state.current_challenge = Some(FreedPuzzle {
            command: "mine block",
            description: "SHA256(\"FREED + nonce\") needs 2 leading zeroes. Solve with \"mine block\".".into(),
            solution: "mine block",
        });
        let mut out: Vec<String> = [
            "ORACLE OF BLOCKS:",
            "FreedBlock #1 => data: FREED",
            "Required Hash Prefix: 00",
            "Nonce: ???",
            "",
            "Type 'solve mine block' if you find the correct nonce.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        out.extend(done);
        Reply::Lines(out)
    }
}

fn help() -> Reply {
    lines([
        "Available commands:",
        "- help: Show this help message",
        "- look: Describe where you are",
        "- ls: List directory contents",
        "- cd [directory]: Change directory",
        "- cat [file]: Read file contents",
        "- grep [pattern] [file]: Search logs or files",
        "- connect [device]: Connect to a device (like /dev/nullmatrix)",
        "- train: Start a training puzzle (inside the Construct)",
        "- simulate: Consult the Oracle of Blocks",
        "- kill [process]: Terminate a process (e.g. AgentSmith)",
        "- nano [file]: Edit a file (e.g. Makefile)",
        "- make: Compile the Freed Kernel",
        "- base64 [-d] [text]: Encode or decode base64",
        "- status: Check your current status/progress",
        "- inventory: Check your items",
        "- use [item]: Use an item from your inventory",
        "- talk [character]: Talk to Freed NPCs (synapse, cipherkey, flowstate)",
        "- solve [solution]: Solve a puzzle challenge",
        "- hint: Get a hint for the current puzzle",
        "- close: Close the current puzzle",
        "- exit: Exit Freed OS simulation",
        "- clear: Clear the screen",
        "",
        "SYNAPSE: \"Explore your home directory for something important.\"",
    ])
}

fn talk(character: &str) -> Reply {
    let line = match character.to_lowercase().as_str() {
        "synapse" => "SYNAPSE: \"Remember, illusions define Freed OS. Keep exploring.\"".to_string(),
        "cipherkey" => "CIPHERKEY: \"Crypto puzzles are the key to rewriting Freed OS.\"".to_string(),
        "flowstate" => "FLOWSTATE: \"I sense Agent traffic in the logs, Neo. Stay hidden.\"".to_string(),
        _ => format!("{} isn't here.", character),
    };
    Reply::Lines(vec![format!("Talking to {}...", character), line])
}

fn base64_cmd(args: &[&str]) -> Reply {
    match args {
        ["-d", rest @ ..] if !rest.is_empty() => {
            let input = rest.join(" ");
            let decoded = STANDARD
                .decode(input.trim_matches('"'))
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok());
            match decoded {
                Some(text) => Reply::Lines(vec![text]),
                None => lines(["base64: invalid input"]),
            }
        }
        [] | ["-d"] => lines(["Usage: base64 [-d] [text]"]),
        _ => Reply::Lines(vec![STANDARD.encode(args.join(" "))]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::ScriptedDice;

    fn run(os: &mut FreedOs, input: &str) -> Vec<String> {
        let mut dice = ScriptedDice::always(0.0);
        match os.handle(input, &mut dice) {
            Reply::Lines(l) | Reply::Exit(l) => l,
            Reply::Clear => vec!["<clear>".into()],
        }
    }

    fn logged_in() -> FreedOs {
        let mut os = FreedOs::new("neo");
        run(&mut os, "login");
        os
    }

    #[test]
    fn test_login_gate() {
        let mut os = FreedOs::new("neo");
        assert_eq!(run(&mut os, "ls"), vec!["Please log in first. Type 'login' to begin."]);
        let out = run(&mut os, "login");
        assert!(out.contains(&"(Objective completed: Log in to Freed OS)".to_string()));
        assert!(out.contains(&"Next Objective: Read the README file".to_string()));
        assert_eq!(os.state().story_progress, 1);
        assert_eq!(os.prompt(), "neo@/home/neo:~$ ");
        assert_eq!(
            run(&mut os, "login"),
            vec!["You've already completed this step. Move on to the next command."]
        );
    }

    #[test]
    fn test_readme_objective_once() {
        let mut os = logged_in();
        let first = run(&mut os, "cat README");
        assert!(first[0].contains("Welcome to Freed OS 1.0") || first[1].contains("Welcome to Freed OS 1.0"));
        assert!(first.contains(&"(Objective completed: Read the README file)".to_string()));
        let second = run(&mut os, "cat readme");
        assert!(!second.iter().any(|l| l.contains("Objective completed")));
        let hits = os
            .state()
            .completed_objectives
            .iter()
            .filter(|o| *o == "Read the README file")
            .count();
        assert_eq!(hits, 1);
        assert_eq!(os.state().story_progress, 2);
    }

    #[test]
    fn test_awakening_ending() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "make"), vec!["Cannot run 'make' here. Try '/usr/src/kernel_freedom'."]);
        run(&mut os, "cd /usr/src/kernel_freedom");
        assert_eq!(os.state().current_location.to_string(), "/usr/src/kernel_freedom");
        assert!(run(&mut os, "make")[0].starts_with("You must edit the Makefile first"));
        run(&mut os, "nano Makefile");
        run(&mut os, "solve 1");
        let out = run(&mut os, "make").join("\n");
        assert!(out.contains("mass awakening"));
        assert!(!out.contains("covert infiltration"));
        assert!(os.state().is_game_over);
    }

    #[test]
    fn test_infiltration_ending() {
        let mut os = logged_in();
        run(&mut os, "cd /usr/src/kernel_freedom");
        run(&mut os, "nano makefile");
        run(&mut os, "solve 0");
        let out = run(&mut os, "make").join("\n");
        assert!(out.contains("covert infiltration"));
        assert_eq!(os.state().freedom_choice(), Some(FreedomChoice::Infiltrate));
    }

    #[test]
    fn test_choice_is_locked() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "solve 1"), vec!["No active challenge to solve."]);
        assert_eq!(os.state().freedom_choice(), None);

        run(&mut os, "cd /usr/src/kernel_freedom");
        run(&mut os, "nano Makefile");
        assert_eq!(run(&mut os, "solve 2")[0], "Invalid choice. Use 'solve 1' for mass awakening or 'solve 0' for gradual infiltration.");
        run(&mut os, "solve 1");
        for attempt in ["solve 0", "nano Makefile", "solve 0", "close", "solve 1"] {
            run(&mut os, attempt);
            assert_eq!(os.state().freedom_choice(), Some(FreedomChoice::Awaken));
        }
        assert!(run(&mut os, "make").join(" ").contains("mass awakening"));
        run(&mut os, "solve 0");
        assert_eq!(os.state().freedom_choice(), Some(FreedomChoice::Awaken));
    }

    #[test]
    fn test_cd_validates_against_filesystem() {
        let mut os = logged_in();
        let out = run(&mut os, "cd /nowhere");
        assert_eq!(out, vec!["cd: /nowhere: No such file or directory: /nowhere"]);
        assert_eq!(os.state().current_location.to_string(), "/home/neo");
        run(&mut os, "cd /var/log");
        assert_eq!(run(&mut os, "ls"), vec!["agent_warnings  dmesg  system.log"]);
        run(&mut os, "cd");
        assert_eq!(os.state().current_location.to_string(), "/home/neo");
    }

    #[test]
    fn test_connect_and_train() {
        let mut os = logged_in();
        assert!(run(&mut os, "train")[0].starts_with("There is nothing to train"));
        let out = run(&mut os, "connect /dev/nullmatrix");
        assert!(out.contains(&"(Objective completed: Connect to the Null Matrix)".to_string()));
        assert_eq!(os.state().current_location, Location::Construct);
        assert_eq!(run(&mut os, "connect /dev/nullmatrix"), vec!["Connected to the Freed Construct again."]);

        let out = run(&mut os, "train");
        assert_eq!(out[0], "New challenge started: Decrypt base64: \"VGhlcmUgaXMgbm8gc3Bvb24u\"");
        assert_eq!(run(&mut os, "solve there is no spoon")[0], "Correct! Freed training puzzle solved.");
        assert_eq!(os.state().knowledge.get(), 10);
        assert!(os.state().completed_objectives.contains(&TRAINING.to_string()));
    }

    #[test]
    fn test_kill_and_grep() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "kill neo"), vec!["No such process. Possibly 'kill AgentSmith'?"]);
        let first = run(&mut os, "kill AgentSmith");
        let second = run(&mut os, "kill AgentSmith");
        assert!(first.len() > second.len());
        assert_eq!(second, vec!["AgentSmith process terminated successfully."]);

        let out = run(&mut os, "grep agent_traffic /var/log/agent_warnings");
        assert_eq!(out[0], "AGENT_TRAFFIC detected at 02:14:33");
        assert!(out.last().is_some_and(|l| l.starts_with("SYNAPSE")));
        assert_eq!(run(&mut os, "grep zzz /var/log/dmesg"), vec!["No matches found."]);
    }

    #[test]
    fn test_simulate_once() {
        let mut os = logged_in();
        let out = run(&mut os, "simulate blockchain");
        assert_eq!(out[0], "ORACLE OF BLOCKS:");
        assert_eq!(run(&mut os, "simulate"), vec!["No blockchain puzzle available."]);
        assert_eq!(run(&mut os, "solve mine block")[0], "Correct! Blockchain puzzle solved. Knowledge +10%.");
        assert_eq!(os.state().inventory, vec!["oracle_token"]);
    }

    #[test]
    fn test_base64() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "base64 -d VGhlcmUgaXMgbm8gc3Bvb24u"), vec!["There is no spoon."]);
        assert_eq!(run(&mut os, "base64 hi"), vec!["aGk="]);
        assert_eq!(run(&mut os, "base64 -d !!!"), vec!["base64: invalid input"]);
    }

    #[test]
    fn test_game_over_limits_commands() {
        let mut os = logged_in();
        run(&mut os, "cd /usr/src/kernel_freedom");
        run(&mut os, "nano Makefile");
        run(&mut os, "solve 1");
        run(&mut os, "make");
        assert!(run(&mut os, "ls")[0].starts_with("GAME OVER"));
        assert!(run(&mut os, "status").iter().any(|l| l.starts_with("Story Progress:")));
        assert_eq!(os.handle("exit", &mut ScriptedDice::always(0.0)), Reply::Exit(vec!["Exiting Freed OS simulation...".into()]));
    }

    #[test]
    fn test_look_describes_each_location() {
        let mut os = logged_in();
        let cases = [
            ("~", "You're in Neo's home directory. Files: README, messages, secrets."),
            ("/dev", "A device directory containing 'nullmatrix'... suspicious."),
            ("/etc/agent_config", "Agent config directory. There's a watchlist file here."),
            ("/var/log", "System logs. Could check agent_warnings or dmesg files."),
            ("/usr/src/kernel_freedom", "Kernel directory with Makefile for Freed OS choice."),
            ("/usr", "It's an unknown path in Freed OS. The Matrix is silent... for now."),
        ];
        for (dir, expected) in cases {
            run(&mut os, &format!("cd {}", dir));
            assert_eq!(run(&mut os, "look"), vec![expected], "{}", dir);
        }
        run(&mut os, "connect /dev/nullmatrix");
        assert_eq!(
            run(&mut os, "look"),
            vec!["You're in the Freed Construct. CipherKey, FlowState watch you train."]
        );
    }

    #[test]
    fn test_talk_to_npcs() {
        let mut os = logged_in();
        assert_eq!(
            run(&mut os, "talk cipherkey"),
            vec!["Talking to cipherkey...", "CIPHERKEY: \"Crypto puzzles are the key to rewriting Freed OS.\""]
        );
        assert!(run(&mut os, "talk Synapse")[1].starts_with("SYNAPSE:"));
        assert!(run(&mut os, "talk flowstate")[1].starts_with("FLOWSTATE:"));
        assert_eq!(run(&mut os, "talk morpheus")[1], "morpheus isn't here.");
    }

    #[test]
    fn test_inventory_and_use() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "inventory"), vec!["Your inventory is empty."]);
        assert_eq!(run(&mut os, "use construct_access"), vec!["You don't have that item."]);
        run(&mut os, "connect /dev/nullmatrix");
        assert_eq!(run(&mut os, "inventory"), vec!["Inventory: construct_access"]);
        assert_eq!(run(&mut os, "use construct_access"), vec!["You used construct_access."]);
    }

    #[test]
    fn test_hint_and_close() {
        let mut os = logged_in();
        assert_eq!(run(&mut os, "hint"), vec!["No puzzle active. 'train' or 'simulate' to start one?"]);
        run(&mut os, "connect /dev/nullmatrix");
        run(&mut os, "train");
        assert_eq!(
            run(&mut os, "hint"),
            vec!["Hint: Decrypt base64: \"VGhlcmUgaXMgbm8gc3Bvb24u\""]
        );
        assert_eq!(run(&mut os, "close"), vec!["Challenge closed."]);
        assert!(os.state().current_challenge.is_none());
        assert_eq!(run(&mut os, "solve there is no spoon"), vec!["No active challenge to solve."]);
        assert!(!os.state().has(TRAINING));
    }

    #[test]
    fn test_clear_and_empty_file() {
        let mut os = logged_in();
        assert_eq!(os.handle("clear", &mut ScriptedDice::always(0.0)), Reply::Clear);
        assert_eq!(
            run(&mut os, "cat /dev/nullmatrix"),
            vec!["/dev/nullmatrix is empty. Nothing but static."]
        );
    }

    #[test]
    fn test_snapshot_shape() {
        let os = logged_in();
        let json = serde_json::to_value(os.state()).unwrap();
        assert_eq!(json["current_location"], "/home/neo");
        assert_eq!(json["freedom_choice"], serde_json::Value::Null);
        assert_eq!(json["objectives"].as_array().map(|a| a.len()), Some(8));
    }
}
