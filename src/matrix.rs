use crate::challenge::{self, Puzzle};
use crate::entropy::Dice;
use crate::meter::Meter;
use serde::Serialize;

pub const WELCOME: &str = "Welcome to the Matrix Simulation!

You find yourself in the Construct, a loading program for the Matrix.
Your mission: navigate the real and digital worlds, raise your awareness, and defend Zion.

Commands:
- \"look\" to examine your surroundings
- \"inventory\" to view your items
- \"status\" to check awareness & health
- Type context-sensitive commands (\"take red pill\", \"hack terminal\", etc.)
- \"help\" shows location-specific commands
- \"exit\" ends the game

Free your mind. Type \"look\" to begin.";

const UNKNOWN: &str = "Unknown command. Type 'help' to see available commands.";
const OVER: &str = "The simulation is over. Type 'exit' to stop playing.";
const COLLAPSE: &str = "Your health hit 0. You collapse, and the simulation ends.";
const NO_CHALLENGE: &str = "No active challenge. Try hacking a terminal.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Construct,
    Training,
    Matrix,
    OracleTemple,
    Zion,
    MachineCity,
}

impl Location {
    pub fn key(self) -> &'static str {
        match self {
            Location::Construct => "construct",
            Location::Training => "training",
            Location::Matrix => "matrix",
            Location::OracleTemple => "oracleTemple",
            Location::Zion => "zion",
            Location::MachineCity => "machineCity",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Location::Construct => "You find yourself in the Construct, a pristine white void. Before you stands a table with two pills - one red, one blue. Morpheus waits for your choice. Type 'look' or choose your pill.",
            Location::Training => "You're in the Construct's training program. A minimalist dojo stands ready, surrounded by racks of virtual weapons. This is where you learn to bend the rules of the Matrix.",
            Location::Matrix => "Cascading green code shapes a city around you. Agents lurk in every shadow. A flickering neon sign reads 'Follow the White Rabbit'.",
            Location::OracleTemple => "You enter the Oracle's Temple. Incense drifts through the air. The walls are covered in cryptic symbols, a merging of Greek oracles and digital code. At the center is the Oracle, smiling calmly, waiting for you to ask the right question.",
            Location::Zion => "The last human city, deep beneath the Earth's surface. Machinery thrums all around, and the resistance stands on the brink of war.",
            Location::MachineCity => "You've reached the heart of the machine world. Towering structures hum with synthetic life. A single, monumental AI overseer stares down at you.",
        }
    }

    pub fn commands(self) -> &'static [&'static str] {
        match self {
            Location::Construct => &["take red pill", "take blue pill", "talk to morpheus", "examine pills"],
            Location::Training => &["train combat", "practice dodge", "learn techniques", "spar", "meditate"],
            Location::Matrix => &[
                "hack terminal",
                "dodge bullet",
                "find phone",
                "fight agent",
                "analyze code",
                "solve challenge",
                "enter oracle's temple",
            ],
            Location::OracleTemple => &["talk to oracle", "offer cookies", "ask question", "decipher symbols", "leave temple"],
            Location::Zion => &["train skills", "meet morpheus", "defend zion", "rally humans", "upgrade weapons"],
            Location::MachineCity => &["negotiate", "fight", "sacrifice", "return"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub location: Location,
    pub inventory: Vec<String>,
    pub awareness: Meter,
    pub health: Meter,
    pub is_game_over: bool,
    pub current_challenge: Option<Puzzle>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            location: Location::Construct,
            inventory: Vec::new(),
            awareness: Meter::new(0),
            health: Meter::full(),
            is_game_over: false,
            current_challenge: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The player typed `exit`.
    Exited,
    /// A narrative ending or health collapse; the session disconnects.
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub text: String,
    pub outcome: Outcome,
    /// Set when the turn asks the page to show the active puzzle.
    pub reveal: Option<Puzzle>,
}

impl Turn {
    fn say(text: impl Into<String>) -> Turn {
        Turn {
            text: text.into(),
            outcome: Outcome::Continue,
            reveal: None,
        }
    }

    fn ending(text: impl Into<String>) -> Turn {
        Turn {
            text: text.into(),
            outcome: Outcome::Ended,
            reveal: None,
        }
    }
}

#[derive(Default)]
pub struct MatrixGame {
    state: GameState,
}

impl MatrixGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = GameState::default();
    }

    pub fn prompt(&self) -> String {
        format!("matrix@{}:$ ", self.state.location.key())
    }

    pub fn handle(&mut self, input: &str, dice: &mut dyn Dice) -> Turn {
        let command = input
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match command.as_str() {
            "restart" => {
                self.reset();
                log::info!("matrix simulation restarted");
                return Turn::say(format!(
                    "The simulation reloads from the beginning.\n\n{}",
                    Location::Construct.description()
                ));
            }
            "exit" => {
                self.state.is_game_over = true;
                return Turn {
                    text: "Exiting the Matrix simulation. Thanks for playing!".into(),
                    outcome: Outcome::Exited,
                    reveal: None,
                };
            }
            _ => {}
        }

        if self.state.is_game_over {
            return Turn::say(OVER);
        }
        if self.state.health.is_depleted() {
            self.state.is_game_over = true;
            return Turn::ending(COLLAPSE);
        }

        let turn = match self.universal(&command) {
            Some(turn) => turn,
            None if self.state.location.commands().contains(&command.as_str()) => {
                self.at_location(&command, dice)
            }
            None => Turn::say(UNKNOWN),
        };
        self.settle(turn)
    }

    /// Checks an answer against the active puzzle.
    pub fn solve(&mut self, answer: &str) -> Turn {
        if self.state.is_game_over {
            return Turn::say(OVER);
        }
        let Some(puzzle) = self.state.current_challenge else {
            return Turn::say("No active challenge or invalid command format.");
        };
        let turn = if challenge::check(answer, puzzle.solution) {
            self.state.awareness.raise(25);
            self.state
                .inventory
                .push(format!("solved_{}", challenge::slug(puzzle.name)));
            self.state.current_challenge = None;
            log::debug!("puzzle '{}' solved", puzzle.name);
            Turn::say("Correct! The puzzle unravels, and you gain deeper insight into the Matrix. Your awareness spikes.")
        } else {
            self.state.health.lower(10);
            Turn::say("Incorrect. The system's defense punishes your mistake. Try again or look for more clues.")
        };
        self.settle(turn)
    }

    pub fn close_challenge(&mut self) -> bool {
        self.state.current_challenge.take().is_some()
    }

    /// Health reaching zero ends the game regardless of what the turn did.
    fn settle(&mut self, mut turn: Turn) -> Turn {
        if !self.state.is_game_over && self.state.health.is_depleted() {
            self.state.is_game_over = true;
            turn.text = format!("{}\n\n{}", turn.text, COLLAPSE);
            turn.outcome = Outcome::Ended;
        }
        if turn.outcome == Outcome::Ended {
            log::info!("matrix simulation ended at {}", self.state.location.key());
        }
        turn
    }

    fn universal(&mut self, command: &str) -> Option<Turn> {
        for prefix in ["submit_solution", "check_solution", "submit"] {
            if let Some(rest) = command.strip_prefix(prefix) {
                if rest.is_empty() || rest.starts_with(' ') {
                    return Some(self.solve(rest.trim()));
                }
            }
        }
        let state = &self.state;
        let text = match command {
            "look" => state.location.description().to_string(),
            "inventory" => {
                let items = if state.inventory.is_empty() {
                    "Empty".to_string()
                } else {
                    state.inventory.join(", ")
                };
                format!("Inventory: {}", items)
            }
            "status" => format!("Awareness: {}, Health: {}", state.awareness, state.health),
            "help" => format!(
                "Available commands in {}:\n{}\n\nUniversal commands:\n- look\n- inventory\n- status\n- help\n- hint\n- restart\n- exit (ends the simulation)",
                state.location.key(),
                state.location.commands().join("\n")
            ),
            "hint" => match &state.current_challenge {
                Some(p) => format!("Hint: {}", p.hint),
                None => NO_CHALLENGE.to_string(),
            },
            "close challenge" => {
                if self.close_challenge() {
                    "Challenge closed.".to_string()
                } else {
                    NO_CHALLENGE.to_string()
                }
            }
            _ => return None,
        };
        Some(Turn::say(text))
    }

    fn at_location(&mut self, command: &str, dice: &mut dyn Dice) -> Turn {
        match self.state.location {
            Location::Construct => self.construct(command),
            Location::Training => self.training(command, dice),
            Location::Matrix => self.matrix(command, dice),
            Location::OracleTemple => self.temple(command, dice),
            Location::Zion => self.zion(command),
            Location::MachineCity => self.machine_city(command),
        }
    }

    fn construct(&mut self, command: &str) -> Turn {
        let s = &mut self.state;
        match command {
            "take red pill" => {
                s.location = Location::Training;
                s.awareness.raise(20);
                s.health.lower(10);
                s.inventory.push("neural interface".into());
                Turn::say("You swallow the red pill. Reality bends, the Construct fades, and you awaken groggily in a training simulation. Your health dips from the shock, but your awareness grows.")
            }
            "take blue pill" => {
                s.is_game_over = true;
                log::info!("blue pill taken");
                Turn::say("You take the blue pill and drift back into comfortable ignorance. Game Over.")
            }
            "talk to morpheus" => {
                s.awareness.raise(5);
                Turn::say("Morpheus: 'I can only show you the door. You're the one who has to walk through it.' Your awareness increases slightly.")
            }
            "examine pills" => {
                s.awareness.raise(2);
                Turn::say("One pill to continue believing what you want, another to learn the truth of the Matrix. Awareness nudges upward as you ponder your choice.")
            }
            _ => Turn::say(UNKNOWN),
        }
    }

    fn training(&mut self, command: &str, dice: &mut dyn Dice) -> Turn {
        let s = &mut self.state;
        match command {
            "train combat" => {
                if dice.roll() > 0.7 {
                    s.awareness.raise(15);
                    s.health.lower(5);
                    Turn::say("You throw yourself into intense combat training. Your awareness leaps forward, but you take a few bruising hits.")
                } else {
                    s.awareness.raise(10);
                    Turn::say("Your muscles memorize each move as you spar against simulated foes. Awareness rises steadily.")
                }
            }
            "practice dodge" => {
                if s.awareness.get() < 30 {
                    Turn::say("You feel the bullet whiz by before you can dodge. Perhaps you need higher awareness to pull this off consistently.")
                } else if dice.roll() > 0.6 {
                    s.awareness.raise(20);
                    Turn::say("Bullets slow to a crawl as you twist your body. Your mastery of the Matrix grows quickly.")
                } else {
                    s.health.lower(15);
                    Turn::say("A near miss draws a line of pain across your arm. You're not fast enough yet.")
                }
            }
            "learn techniques" => {
                s.awareness.raise(10);
                s.inventory.push("combat_training".into());
                Turn::say("A surge of data floods your mind. Krav Maga, Kung Fu, and more, knowledge instantly uploaded to your neural interface.")
            }
            "spar" => {
                if dice.roll() > 0.5 {
                    s.awareness.raise(10);
                    s.health.lower(10);
                    Turn::say("You trade blows with a skilled AI opponent. The lesson is a hard one, and you come away more aware but battered.")
                } else {
                    s.awareness.raise(5);
                    Turn::say("You deftly deflect every strike. The AI can't touch you. Well done.")
                }
            }
            "meditate" => {
                if s.awareness.get() >= 50 {
                    s.location = Location::Matrix;
                    s.health.raise(20);
                    Turn::say("You find inner calm, stepping beyond the boundaries of the Construct. The next time you open your eyes, you're in the Matrix. Your health improves.")
                } else {
                    s.awareness.raise(5);
                    s.health.raise(5);
                    Turn::say("You clear your mind, aligning body and code. Awareness and health improve slightly. Keep training to unlock the next step.")
                }
            }
            _ => Turn::say(UNKNOWN),
        }
    }

    fn matrix(&mut self, command: &str, dice: &mut dyn Dice) -> Turn {
        match command {
            "hack terminal" => {
                if dice.roll() > 0.6 {
                    let (kind, puzzle) = challenge::draw(dice);
                    let s = &mut self.state;
                    s.current_challenge = Some(puzzle);
                    s.awareness.raise(15);
                    s.inventory.push("access_codes".into());
                    Turn::say(format!(
                        "Success! You've hacked into a terminal. A new {} challenge is available. Type 'solve challenge' to view it.",
                        kind.label()
                    ))
                } else {
                    self.state.awareness.lower(10);
                    self.state.health.lower(20);
                    Turn::say("The hack triggers an alert. Agents swarm your location, and you escape with injuries. Awareness drops slightly.")
                }
            }
            "dodge bullet" => {
                if self.state.awareness.get() >= 60 {
                    self.state.awareness.raise(10);
                    Turn::say("Time slows. You lean back as the bullets ripple past. The Agent hesitates, unsure what you are becoming.")
                } else {
                    self.state.health.lower(15);
                    Turn::say("You try to move like Neo, but the bullet grazes your shoulder. You need more awareness.")
                }
            }
            "find phone" => {
                if self.state.awareness.get() >= 75 {
                    self.state.location = Location::Zion;
                    Turn::say("A payphone rings at the end of the street. You answer, and the line pulls you out of the Matrix. You wake aboard a hovercraft bound for Zion.")
                } else {
                    Turn::say("You hear a phone ringing somewhere, but you cannot tell where. Your perception of the Matrix is not sharp enough yet.")
                }
            }
            "fight agent" => {
                if dice.roll() > 0.5 {
                    self.state.awareness.raise(15);
                    self.state.health.lower(10);
                    Turn::say("You trade blows with an Agent and hold your ground. The code bends around your fists.")
                } else {
                    self.state.health.lower(25);
                    Turn::say("The Agent is faster than anything human. You barely escape through a hard line.")
                }
            }
            "analyze code" => {
                self.state.awareness.raise(5);
                Turn::say("You stare into the falling glyphs until shapes emerge: a blonde, a brunette, a redhead. Awareness rises.")
            }
            "solve challenge" => match self.state.current_challenge {
                Some(puzzle) => Turn {
                    text: format!(
                        "Challenge: {}\n\nOpening challenge details. Check the terminal window for the puzzle.",
                        puzzle.name
                    ),
                    outcome: Outcome::Continue,
                    reveal: Some(puzzle),
                },
                None => Turn::say(NO_CHALLENGE),
            },
            "enter oracle's temple" => {
                if self.state.awareness.get() >= 40 {
                    self.state.location = Location::OracleTemple;
                    Turn::say("You follow cryptic graffiti through a back alley. The world flickers, and you step into the Oracle's Temple.")
                } else {
                    Turn::say("A strange door appears in the alley, but it remains firmly locked. Maybe you need more awareness to perceive it.")
                }
            }
            _ => Turn::say(UNKNOWN),
        }
    }

    fn temple(&mut self, command: &str, dice: &mut dyn Dice) -> Turn {
        let s = &mut self.state;
        match command {
            "talk to oracle" => {
                s.awareness.raise(10);
                Turn::say("The Oracle: 'You already know what I'm going to say, don't you?' A wave of insight hits you, increasing your awareness.")
            }
            "offer cookies" => {
                if s.inventory.iter().any(|i| i == "cookie_tin") {
                    Turn::say("She already has a tin of your cookies, and you sense too many sweets might break the simulation.")
                } else {
                    s.inventory.push("cookie_tin".into());
                    s.awareness.raise(5);
                    Turn::say("You hand the Oracle a tin of cookies you somehow have in your pack. She smiles knowingly. 'I knew you would.'")
                }
            }
            "ask question" => {
                s.awareness.raise(5);
                Turn::say("You ask the Oracle about your destiny. She offers cryptic reassurance: 'Know thyself, and you shall know the path.'")
            }
            "decipher symbols" => {
                if dice.roll() > 0.5 {
                    s.awareness.raise(15);
                    Turn::say("You translate ancient texts that reference cycles of the One. The lines between code and prophecy blur in your mind.")
                } else {
                    s.health.lower(10);
                    Turn::say("Your mind recoils from the riddles. Reality flickers, and you feel a sharp headache. You lose some health.")
                }
            }
            "leave temple" => {
                s.location = Location::Matrix;
                Turn::say("You bow to the Oracle and step back into the alley. The city hums around you again.")
            }
            _ => Turn::say(UNKNOWN),
        }
    }

    fn zion(&mut self, command: &str) -> Turn {
        let s = &mut self.state;
        match command {
            "train skills" => {
                s.awareness.raise(25);
                s.health.raise(10);
                Turn::say("You fine-tune your powers with top Zion warriors. Your awareness and health climb.")
            }
            "meet morpheus" => {
                s.awareness.raise(15);
                Turn::say("Morpheus shares new intel on Machine attacks. 'Hope is our most powerful weapon,' he says. Your awareness expands.")
            }
            "defend zion" => {
                if s.awareness.get() >= 90 && s.health.get() >= 80 {
                    s.location = Location::MachineCity;
                    Turn::say("Your leadership repels a massive assault. The machines call for negotiation. You leave for the Machine City.")
                } else if s.awareness.get() >= 90 {
                    s.health.lower(30);
                    Turn::say("Zion stands, but you sustain wounds in the battle. You must recover before you confront the Machine City.")
                } else {
                    s.health.lower(50);
                    Turn::say("You fight bravely, but your underdeveloped awareness leaves you vulnerable. Heavy casualties burden Zion.")
                }
            }
            "rally humans" => {
                s.awareness.raise(15);
                s.health.raise(5);
                Turn::say("You inspire the city with your tales of the Matrix. Morale surges, and your own health recovers a bit.")
            }
            "upgrade weapons" => {
                if s.inventory.iter().any(|i| i == "emp_device") {
                    s.awareness.raise(5);
                    Turn::say("You've already built the ultimate EMP, but you refine the design a bit, boosting your awareness.")
                } else {
                    s.inventory.push("emp_device".into());
                    s.awareness.raise(10);
                    Turn::say("You design a portable EMP that disrupts machine signals. Your understanding of the Matrix deepens.")
                }
            }
            _ => Turn::say(UNKNOWN),
        }
    }

    fn machine_city(&mut self, command: &str) -> Turn {
        let s = &mut self.state;
        match command {
            "negotiate" => {
                if s.awareness.get() >= 95 {
                    s.is_game_over = true;
                    Turn::ending("Your expanded awareness helps you negotiate peace. Both man and machine find a new dawn. Congratulations, you've won!")
                } else {
                    Turn::say("Your arguments fall on deaf sensors. The Machine AI sees through your inexperience. Boost awareness and try again.")
                }
            }
            "fight" => {
                if s.health.get() >= 90 {
                    s.is_game_over = true;
                    Turn::ending("You unleash everything you've learned. Sparks fly as machine overlords crumble. Victory is yours, but the future remains uncertain. You have finished the Matrix Simulation!")
                } else {
                    s.health.lower(40);
                    Turn::say("A fierce battle leaves you wounded. If health hits 0, you lose. You might need a different approach.")
                }
            }
            "sacrifice" => {
                s.is_game_over = true;
                Turn::ending("You surrender yourself as a catalyst to restart the Matrix's cycle, hoping humanity gets another chance. Bittersweet ending.")
            }
            "return" => {
                s.location = Location::Zion;
                Turn::say("You retreat to Zion to regroup, your mind still reeling from the sheer scale of Machine City.")
            }
            _ => Turn::say(UNKNOWN),
        }
    }
}
