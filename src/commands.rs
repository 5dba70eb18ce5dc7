use crate::{
    editor::Editor,
    entropy::timestamp,
    error::VfsError,
    kernel::Kernel,
    output::{Mode, Output, Panel, Section},
    profile,
    vfs::NodeKind,
};
use std::collections::BTreeMap;

pub type Run = fn(&mut Kernel, &[&str]) -> Output;

pub struct Command {
    pub summary: &'static str,
    pub run: Run,
}

/// Terminal built-ins keyed by their exact, case-sensitive name.
pub struct Registry {
    progs: BTreeMap<&'static str, Command>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    pub fn builtin() -> Self {
        let mut r = Registry {
            progs: BTreeMap::new(),
        };
        let table: &[(&'static str, &'static str, Run)] = &[
            ("help", "Show this help message", cmd_help),
            ("about", "Display information about me", cmd_about),
            ("skills", "List my technical skills", cmd_skills),
            ("projects", "Show my project list", cmd_projects),
            ("contact", "Display my contact information", cmd_contact),
            ("ascii", "Show ASCII art", |_, _| Output::text(profile::ASCII_ART)),
            ("clear", "Clear the terminal screen", |_, _| Output::Clear),
            ("echo", "Repeat the given text", |_, args| Output::text(args.join(" "))),
            ("date", "Show current date and time", |k, _| Output::text(k.timestamp())),
            ("ls", "List contents of current directory", cmd_ls),
            ("cd", "Change directory", cmd_cd),
            ("pwd", "Print working directory", |k, _| Output::text(k.fs.pwd())),
            ("touch", "Create a new file", cmd_touch),
            ("vim", "Open vim-style editor", cmd_vim),
            ("play", "Start \"The Matrix Simulation\" text adventure game", cmd_play),
            ("game", "Run a single Matrix Simulation command", cmd_game),
            ("grep", "Search projects, profiles and files", cmd_grep),
            ("resume", "Open my resume PDF in a new tab", |_, _| {
                Output::open(profile::RESUME_URL, "Opening resume in a new tab...")
            }),
            ("github", "Open my GitHub profile", |_, _| social("github", "Opening GitHub profile")),
            ("twitter", "Open my Twitter profile", |_, _| social("twitter", "Opening Twitter profile")),
            ("linkedin", "Open my LinkedIn profile", |_, _| social("linkedin", "Opening LinkedIn profile")),
            ("telegram", "Open my Telegram profile", |_, _| social("telegram", "Opening Telegram chat")),
            ("warpcast", "Open my Warpcast profile", |_, _| {
                Output::open(profile::WARPCAST_URL, "Opening Warpcast profile in a new tab...")
            }),
            ("cat", "Display the content of a file", cmd_cat),
            ("write", "Save text to a file", cmd_write),
            ("read", "Print a saved file", cmd_read),
            ("gui", "Switch to GUI mode", |_, _| Output::switch(Mode::Gui)),
            ("kernel", "Boot the Freed OS kernel", |_, _| Output::switch(Mode::FreedOs)),
            ("history", "Show command history", cmd_history),
        ];
        for &(name, summary, run) in table {
            r.progs.insert(name, Command { summary, run });
        }
        r
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.progs.keys().copied()
    }

    pub fn execute(&self, kernel: &mut Kernel, line: &str) -> Output {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return Output::text("");
        };
        match self.progs.get(cmd) {
            Some(command) => (command.run)(kernel, args),
            None => {
                log::debug!("unknown command: {}", cmd);
                Output::text(format!(
                    "Command not found: {}. Type 'help' for a list of available commands.",
                    line.trim()
                ))
            }
        }
    }

    fn help(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for (name, command) in &self.progs {
            out.push_str(&format!("{:<9}- {}\n", name, command.summary));
        }
        out.push_str(
            "Matrix Simulation Game Commands (once in \"play\"):\n- look\n- inventory\n- status\n- help\n- exit\n... plus various location-based commands like \"take red pill\", \"hack terminal\", etc.",
        );
        out
    }
}

fn cmd_help(_: &mut Kernel, _: &[&str]) -> Output {
    Output::text(Registry::builtin().help())
}

fn cmd_about(_: &mut Kernel, _: &[&str]) -> Output {
    let mut sections = vec![Section {
        heading: String::new(),
        lines: vec![profile::ABOUT_INTRO.into()],
        link: None,
    }];
    sections.extend(profile::ABOUT.iter().map(|(heading, lines)| Section {
        heading: heading.to_string(),
        lines: lines.iter().map(|l| l.to_string()).collect(),
        link: None,
    }));
    Output::Panel(Panel {
        title: profile::ABOUT_TITLE.into(),
        sections,
    })
}

fn cmd_projects(_: &mut Kernel, _: &[&str]) -> Output {
    let sections = profile::PROJECTS
        .iter()
        .map(|p| {
            let mut lines = vec![
                p.description.to_string(),
                format!("Technologies: {}", p.technologies.join(", ")),
                "Features:".to_string(),
            ];
            lines.extend(p.features.iter().map(|f| format!("- {}", f)));
            Section {
                heading: p.name.into(),
                lines,
                link: Some(p.url.into()),
            }
        })
        .collect();
    Output::Panel(Panel {
        title: "My Projects".into(),
        sections,
    })
}

fn cmd_skills(_: &mut Kernel, _: &[&str]) -> Output {
    Output::text(format!("My skills include:\n{}", profile::SKILLS.join("\n")))
}

fn cmd_contact(_: &mut Kernel, _: &[&str]) -> Output {
    Output::text(profile::CONTACT)
}

fn social(platform: &str, message: &str) -> Output {
    match profile::social(platform) {
        Some(s) => Output::open(s.url, format!("{}: {}", message, s.url)),
        None => Output::text(format!("No {} profile configured.", platform)),
    }
}

fn cmd_ls(k: &mut Kernel, args: &[&str]) -> Output {
    let path = match args.first() {
        Some(arg) => k.fs.resolve_path(arg),
        None => k.fs.cwd.clone(),
    };
    let entries = match k.fs.list(&path) {
        Ok(entries) => entries,
        Err(VfsError::NotADirectory(p)) => return Output::text(format!("ls: {}: Not a directory", p)),
        Err(err) => return Output::text(err.to_string()),
    };
    let now = k.timestamp();
    let lines = entries
        .into_iter()
        .map(|e| {
            let flag = if e.kind == NodeKind::Directory { 'd' } else { '-' };
            let ts = e.modified.map(timestamp).unwrap_or_else(|| now.clone());
            format!("{}rw-r--r-- 1 user user {} {} {}", flag, e.size, ts, e.name)
        })
        .collect();
    Output::lines(lines)
}

fn cmd_cd(k: &mut Kernel, args: &[&str]) -> Output {
    let Some(target) = args.first() else {
        k.fs.cwd = k.fs.home().to_vec();
        return Output::text("");
    };
    match k.fs.cd(target) {
        Ok(()) => Output::text(""),
        Err(VfsError::NotADirectory(_)) => Output::text(format!("cd: {}: Not a directory", target)),
        Err(err) => Output::text(err.to_string()),
    }
}

fn cmd_touch(k: &mut Kernel, args: &[&str]) -> Output {
    let Some(name) = args.first() else {
        return Output::text("touch: missing file operand");
    };
    if k.fs.exists_in_home(name) {
        return Output::text(format!("File '{}' already exists.", name));
    }
    let now = k.now();
    match k.fs.write(name, "", now) {
        Ok(()) => Output::text(format!("Created file: {}", name)),
        Err(err) => Output::text(format!("touch: {}", err)),
    }
}

fn cmd_vim(k: &mut Kernel, args: &[&str]) -> Output {
    let Some(name) = args.first() else {
        return Output::text("vim: missing file operand");
    };
    let content = match k.fs.read(&k.fs.home_path(name)) {
        Ok(content) => content,
        Err(VfsError::IsADirectory(_)) => return Output::text(format!("vim: {}: Is a directory", name)),
        Err(_) => String::new(),
    };
    k.editor = Some(Editor::new(name, &content));
    Output::switch(Mode::Editor)
}

fn cmd_play(k: &mut Kernel, _: &[&str]) -> Output {
    k.matrix.reset();
    Output::switch(Mode::Matrix)
}

fn cmd_game(k: &mut Kernel, args: &[&str]) -> Output {
    Output::text(k.matrix_turn(&args.join(" ")).text)
}

fn cmd_grep(k: &mut Kernel, args: &[&str]) -> Output {
    let Some(term) = args.first() else {
        return Output::text("Usage: grep <search_term> [file_name]");
    };
    let term = term.to_lowercase();
    let matching = |content: &str| -> Vec<String> {
        content
            .lines()
            .filter(|l| l.to_lowercase().contains(&term))
            .map(String::from)
            .collect()
    };

    if let Some(file) = args.get(1) {
        return match k.fs.read(&k.fs.home_path(file)) {
            Ok(content) => {
                let hits = matching(&content);
                if hits.is_empty() {
                    Output::text(format!("No matches found in {}", file))
                } else {
                    Output::lines(hits)
                }
            }
            Err(_) => Output::text(format!("File {} not found", file)),
        };
    }

    let mut results = Vec::new();
    for p in profile::PROJECTS {
        let hit = p.name.to_lowercase().contains(&term)
            || p.description.to_lowercase().contains(&term)
            || p.technologies.iter().any(|t| t.to_lowercase().contains(&term))
            || p.features.iter().any(|f| f.to_lowercase().contains(&term));
        if hit {
            results.push(format!("Project: {}", p.name));
            results.push(format!("Description: {}", p.description));
            results.push(format!("Technologies: {}", p.technologies.join(", ")));
            results.push(format!("Features: {}", p.features.join(", ")));
            results.push(format!("GitHub: {}", p.url));
            results.push(String::new());
        }
    }
    for s in profile::SOCIALS {
        let hit = s.platform.contains(&term)
            || s.username.to_lowercase().contains(&term)
            || s.description.to_lowercase().contains(&term);
        if hit {
            results.push(format!("Social: {}", s.platform));
            results.push(format!("Username: {}", s.username));
            results.push(format!("URL: {}", s.url));
            results.push(format!("Description: {}", s.description));
            results.push(String::new());
        }
    }
    for (name, content) in k.fs.user_files() {
        let hits = matching(content);
        if !hits.is_empty() {
            results.push(format!("File: {}", name));
            results.extend(hits);
            results.push(String::new());
        }
    }
    if results.is_empty() {
        return Output::text("No matches found");
    }
    Output::text(results.join("\n").trim_end().to_string())
}

fn cmd_cat(k: &mut Kernel, args: &[&str]) -> Output {
    let Some(name) = args.first() else {
        return Output::text("Usage: cat <filename>");
    };
    match k.fs.read(&k.fs.resolve_path(name)) {
        Ok(content) if content.starts_with("http") => {
            Output::open(&content, format!("Opening {} in a new tab...", name))
        }
        Ok(content) => Output::text(content),
        Err(VfsError::NotFound(_)) => Output::text(format!("cat: {}: No such file or directory", name)),
        Err(VfsError::IsADirectory(_)) => Output::text(format!("cat: {}: Is a directory", name)),
        Err(err) => Output::text(format!("cat: {}", err)),
    }
}

fn cmd_write(k: &mut Kernel, args: &[&str]) -> Output {
    let [name, content @ ..] = args else {
        return Output::text("Usage: write <filename> <content>");
    };
    if content.is_empty() {
        return Output::text("Usage: write <filename> <content>");
    }
    let now = k.now();
    match k.fs.write(name, &content.join(" "), now) {
        Ok(()) => Output::text(format!("File {} saved.", name)),
        Err(err) => Output::text(format!("write: {}", err)),
    }
}

fn cmd_read(k: &mut Kernel, args: &[&str]) -> Output {
    match args.first() {
        Some(name) => Output::text(k.fs.read(&k.fs.home_path(name)).unwrap_or_default()),
        None => Output::text("Usage: read <filename>"),
    }
}

fn cmd_history(k: &mut Kernel, _: &[&str]) -> Output {
    let lines = k
        .shell
        .history
        .entries()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:4}  {}", i + 1, c))
        .collect();
    Output::lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(k: &mut Kernel, line: &str) -> Output {
        Registry::builtin().execute(k, line)
    }

    fn text(k: &mut Kernel, line: &str) -> String {
        match run(k, line) {
            Output::Text { text } => text,
            other => panic!("expected text for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_unknown_and_case_sensitive() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(
            text(&mut k, "LS"),
            "Command not found: LS. Type 'help' for a list of available commands."
        );
        assert_eq!(
            text(&mut k, "sudo rm -rf /"),
            "Command not found: sudo rm -rf /. Type 'help' for a list of available commands."
        );
        assert_eq!(text(&mut k, "   "), "");
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut k = Kernel::scripted(&[]);
        let help = text(&mut k, "help");
        for name in Registry::builtin().names() {
            assert!(help.contains(name), "{} missing from help", name);
        }
    }

    #[test]
    fn test_ls_home() {
        let mut k = Kernel::scripted(&[]);
        let out = text(&mut k, "ls");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "-rw-r--r-- 1 user user 23 5/15/2024, 09:22:01 .bashrc");
        assert!(lines[1].starts_with("drw-r--r-- 1 user user 4096 "));
        assert!(lines[1].ends_with(" documents"));
        assert_eq!(text(&mut k, "ls nowhere"), "No such file or directory: /home/user/nowhere");
    }

    #[test]
    fn test_cd_pwd() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "cd projects"), "");
        assert_eq!(text(&mut k, "pwd"), "/home/user/projects");
        assert_eq!(text(&mut k, "cd Cube"), "cd: Cube: Not a directory");
        assert_eq!(text(&mut k, "cd /"), "");
        assert_eq!(text(&mut k, "cd .."), "");
        assert_eq!(text(&mut k, "pwd"), "/");
        text(&mut k, "cd");
        assert_eq!(text(&mut k, "pwd"), "/home/user");
        assert_eq!(text(&mut k, "cd missing"), "No such file or directory: /home/user/missing");
        assert_eq!(text(&mut k, "pwd"), "/home/user");
    }

    #[test]
    fn test_touch_write_read() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "touch"), "touch: missing file operand");
        assert_eq!(text(&mut k, "touch todo.txt"), "Created file: todo.txt");
        assert_eq!(text(&mut k, "touch todo.txt"), "File 'todo.txt' already exists.");
        assert_eq!(text(&mut k, "write todo.txt"), "Usage: write <filename> <content>");
        assert_eq!(text(&mut k, "write todo.txt follow the white rabbit"), "File todo.txt saved.");
        assert_eq!(text(&mut k, "read todo.txt"), "follow the white rabbit");
        assert_eq!(text(&mut k, "cat todo.txt"), "follow the white rabbit");
        assert_eq!(text(&mut k, "read nothing"), "");
        assert!(text(&mut k, "ls").ends_with(" todo.txt"));
    }

    #[test]
    fn test_user_file_shadows_home_template() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "touch .bashrc"), "File '.bashrc' already exists.");
        assert_eq!(text(&mut k, "read .bashrc"), "Bash configuration file");
        text(&mut k, "write .bashrc alias ll=ls");

        let ls = text(&mut k, "ls");
        assert_eq!(ls.lines().filter(|l| l.ends_with(" .bashrc")).count(), 1);
        assert_eq!(ls.lines().count(), 4);
        assert_eq!(text(&mut k, "cat .bashrc"), "alias ll=ls");
        assert_eq!(text(&mut k, "read .bashrc"), "alias ll=ls");
        assert_eq!(text(&mut k, "grep alias .bashrc"), "alias ll=ls");

        assert_eq!(text(&mut k, "write projects junk"), "write: Is a directory: /home/user/projects");
        assert_eq!(text(&mut k, "touch social"), "File 'social' already exists.");
        assert_eq!(text(&mut k, "vim documents"), "vim: documents: Is a directory");
        assert!(k.editor.is_none());
        text(&mut k, "cd projects");
        assert_eq!(text(&mut k, "pwd"), "/home/user/projects");
    }

    #[test]
    fn test_cat_variants() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "cat"), "Usage: cat <filename>");
        assert_eq!(text(&mut k, "cat nope"), "cat: nope: No such file or directory");
        assert_eq!(text(&mut k, "cat projects"), "cat: projects: Is a directory");
        assert_eq!(text(&mut k, "cat /etc/hosts"), "Hosts file");
        text(&mut k, "cd projects");
        assert_eq!(
            run(&mut k, "cat Cube"),
            Output::open("https://github.com/Ansh1902396/Cube-", "Opening Cube in a new tab...")
        );
    }

    #[test]
    fn test_grep() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "grep"), "Usage: grep <search_term> [file_name]");
        assert_eq!(text(&mut k, "grep x notes"), "File notes not found");
        text(&mut k, "write notes knock knock neo");
        assert_eq!(text(&mut k, "grep NEO notes"), "knock knock neo");
        assert_eq!(text(&mut k, "grep trinity notes"), "No matches found in notes");
        let out = text(&mut k, "grep sdl");
        assert!(out.contains("Project: KageGroove"));
        assert!(out.contains("Project: Tetris.rs"));
        assert!(text(&mut k, "grep telegram").contains("Social: telegram"));
        assert_eq!(text(&mut k, "grep zzzz"), "No matches found");
    }

    #[test]
    fn test_links_and_modes() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(
            run(&mut k, "github"),
            Output::open(
                "https://github.com/Ansh1902396",
                "Opening GitHub profile: https://github.com/Ansh1902396"
            )
        );
        assert!(matches!(run(&mut k, "resume"), Output::OpenUrl { message, .. } if message == "Opening resume in a new tab..."));
        assert_eq!(run(&mut k, "play"), Output::switch(Mode::Matrix));
        assert_eq!(run(&mut k, "kernel"), Output::switch(Mode::FreedOs));
        assert_eq!(run(&mut k, "gui"), Output::switch(Mode::Gui));
        assert_eq!(run(&mut k, "clear"), Output::Clear);
    }

    #[test]
    fn test_vim_prepares_buffer() {
        let mut k = Kernel::scripted(&[]);
        assert_eq!(text(&mut k, "vim"), "vim: missing file operand");
        text(&mut k, "write a.txt hello");
        assert_eq!(run(&mut k, "vim a.txt"), Output::switch(Mode::Editor));
        let editor = k.editor.as_ref().unwrap();
        assert_eq!(editor.filename(), "a.txt");
        assert_eq!(editor.content(), "hello");
    }

    #[test]
    fn test_game_runs_one_matrix_command() {
        let mut k = Kernel::scripted(&[]);
        text(&mut k, "game take red pill");
        assert_eq!(k.matrix.state().awareness.get(), 20);
        assert_eq!(text(&mut k, "game check_solution zion"), "No active challenge or invalid command format.");
    }

    #[test]
    fn test_panels() {
        let mut k = Kernel::scripted(&[]);
        let Output::Panel(panel) = run(&mut k, "projects") else {
            panic!("projects should produce a panel");
        };
        assert_eq!(panel.sections.len(), profile::PROJECTS.len());
        assert!(panel.sections.iter().all(|s| s.link.is_some()));
        let Output::Panel(about) = run(&mut k, "about") else {
            panic!("about should produce a panel");
        };
        assert_eq!(about.title, "About Rudransh Shinghal");
    }

    #[test]
    fn test_history_numbering() {
        let mut k = Kernel::scripted(&[]);
        k.shell.history.push("ls");
        k.shell.history.push("history");
        assert_eq!(text(&mut k, "history"), "   1  ls\n   2  history");
    }
}
