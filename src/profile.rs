//! Portfolio content: projects, social profiles and the filesystem template.

use crate::vfs::Node;

pub struct Project {
    pub name: &'static str,
    pub description: &'static str,
    pub technologies: &'static [&'static str],
    pub features: &'static [&'static str],
    pub url: &'static str,
}

pub struct Social {
    pub platform: &'static str,
    pub username: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

pub const PROJECTS: &[Project] = &[
    Project {
        name: "Augmentium",
        description: "A decentralized stablecoin pegged to gold using CosmWasm smart contracts on the Cosmos ecosystem.",
        technologies: &["CosmWasm", "Rust", "Cosmos SDK"],
        features: &["99.9% transaction success rate", "15% reduction in gas fees", "Enhanced token interoperability"],
        url: "https://github.com/Ansh1902396/Augmentium",
    },
    Project {
        name: "On-Chain-Data-Encryption",
        description: "A cutting-edge encryption framework using ChaCha20-Poly1305 within Artela Blockchain smart contracts.",
        technologies: &["Solidity", "ChaCha20-Poly1305", "Artela Blockchain"],
        features: &["256-bit security for sensitive information", "Improved data integrity and confidentiality"],
        url: "https://github.com/Ansh1902396/On-Chain-Data-Encryption",
    },
    Project {
        name: "AE-Forge",
        description: "A low-code platform for seamless Sophia smart contract creation, utilizing LLM-based guidance.",
        technologies: &["TypeScript", "React", "Web3Auth"],
        features: &["LLM-based guidance", "Secure authentication", "Enhanced contract deployment pipeline"],
        url: "https://github.com/Ansh1902396/AE-forge",
    },
    Project {
        name: "KageGroove",
        description: "A memory-efficient music player in Rust with SDL, achieving playback latency of under 50ms.",
        technologies: &["Rust", "SDL"],
        features: &["Under 50ms playback latency", "20% reduced memory usage", "MP3 format support"],
        url: "https://github.com/Ansh1902396/KageGroove",
    },
    Project {
        name: "HireSight",
        description: "An LLM-powered interview preparation tool, winner of Crack The Code 3.0.",
        technologies: &["TypeScript", "React", "Node.js"],
        features: &["AI-powered interview questions", "Real-time feedback", "Personalized learning paths"],
        url: "https://github.com/Ansh1902396/HireSight",
    },
    Project {
        name: "Drona-AI",
        description: "AI-Powered Personalized Education Platform inspired by Dronacharya's teachings.",
        technologies: &["Next.js 13", "Stripe", "ShadCN", "Tailwind CSS", "OpenAI API", "ORMs", "DigitalOcean"],
        features: &[
            "AI-Powered Learning Paths",
            "Multilingual support",
            "Dynamic Quiz Generation",
            "Personalized Chatbot for Doubt Resolution",
            "Progress Tracking",
            "Gamification",
        ],
        url: "https://github.com/Ansh1902396/Drona/tree/main",
    },
    Project {
        name: "Cube",
        description: "A toy version of an orchestrator using Golang, demonstrating container management and scheduling.",
        technologies: &["Golang", "Docker"],
        features: &["Container orchestration", "Resource allocation", "Service discovery", "Load balancing"],
        url: "https://github.com/Ansh1902396/Cube-",
    },
    Project {
        name: "Tetris.rs",
        description: "Classic Tetris game implemented in Rust, showcasing systems programming and game development skills.",
        technologies: &["Rust", "SDL2"],
        features: &["Classic Tetris gameplay", "Responsive controls", "Score tracking", "Increasing difficulty levels"],
        url: "https://github.com/Ansh1902396/tetris",
    },
];

pub const SOCIALS: &[Social] = &[
    Social {
        platform: "github",
        username: "Ansh1902396",
        url: "https://github.com/Ansh1902396",
        description: "Check out my open-source projects and contributions",
    },
    Social {
        platform: "linkedin",
        username: "rudransh-shinghal-264b37206",
        url: "https://www.linkedin.com/in/rudransh-shinghal-264b37206/",
        description: "Connect with me professionally and see my work experience",
    },
    Social {
        platform: "twitter",
        username: "rudransh190204",
        url: "https://twitter.com/rudransh190204",
        description: "Follow me for tech insights and updates on my latest projects",
    },
    Social {
        platform: "telegram",
        username: "That_guy_Rudransh",
        url: "https://t.me/That_guy_Rudransh",
        description: "Chat with me on Telegram",
    },
];

pub fn social(platform: &str) -> Option<&'static Social> {
    SOCIALS.iter().find(|s| s.platform == platform)
}

pub const RESUME_URL: &str =
    "https://drive.google.com/file/d/1ejcVHLxkwZoVUDEWsMetoirEUWg4Et_1/view?usp=drive_link";
pub const WARPCAST_URL: &str = "https://warpcast.com/kakashi-hatake19";

pub const SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Next.js",
    "Go (Golang)",
    "Rust",
    "Solidity",
    "Docker",
    "C",
    "Vim",
    "Notion",
    "Bun",
    "React",
    "WebAssembly",
    "Git",
];

pub const CONTACT: &str = "You can reach me at:
Email: rudransh9shinghal@gmail.com
LinkedIn: rudransh-shinghal-264b37206
Twitter: rudransh190204
Telegram: That_guy_Rudransh";

pub const ASCII_ART: &str = r"██████╗ ██╗   ██╗██████╗ ██████╗ ██╗   ██╗███████╗
██╔══██╗██║   ██║██╔══██╗██╔══██╗╚██╗ ██╔╝██╔════╝
██████╔╝██║   ██║██║  ██║██║  ██║ ╚████╔╝ ███████╗
██╔══██╗██║   ██║██║  ██║██║  ██║  ╚██╔╝  ╚════██║
██║  ██║╚██████╔╝██████╔╝██████╔╝   ██║   ███████║
╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ╚═════╝    ╚═╝   ╚══════╝";

pub const ABOUT_TITLE: &str = "About Rudransh Shinghal";
pub const ABOUT_INTRO: &str = "Hi, I'm Rudransh Shinghal, a passionate software developer with a knack for blockchain innovation and clean, scalable code.";

pub const ABOUT: &[(&str, &[&str])] = &[
    (
        "Rust Expertise",
        &[
            "Mastery in Rust: Proficient in building fast, efficient, and memory-safe applications.",
            "Developed production-grade systems using Rust for blockchain and decentralized solutions.",
            "Passion for clean and idiomatic Rust code with a focus on performance and scalability.",
        ],
    ),
    (
        "Blockchain Development",
        &[
            "Designed and deployed smart contracts with CosmWasm and Solidity.",
            "Architected account abstraction models and cross-chain messaging systems.",
            "Contributed to blockchain ecosystems like Oraichain, pushing technological boundaries.",
            "Mentored 100+ developers in blockchain and Cosmos SDK.",
        ],
    ),
    (
        "Why Work With Me?",
        &[
            "Clean Code Advocate: I prioritize maintainable and scalable codebases.",
            "Collaboration-Driven: I thrive in team environments and love sharing knowledge.",
            "Always Innovating: I stay ahead of the curve by exploring new tech and solving complex problems.",
        ],
    ),
];

const NOTES: &str = "The Matrix Simulation Game Notes:

1. Immersive Experience: The game captures the essence of the Matrix universe.
2. Challenging Puzzles: Hacking challenges and cryptographic puzzles add depth.
3. Character Growth: Watch your awareness and skills increase as you progress.
4. Multiple Paths: Choices affect the outcome.
5. Strategic Gameplay: Manage your health and awareness.

Remember: The Matrix has you... Have fun and free your mind!";

const RESUME_TXT: &str = "Rudransh Shinghal
rudransh9shinghal@gmail.com
Education
- LNM Institute of Information Technology, Jaipur (Sept 2022 - May 2027)
  B.Tech-M.Tech in Electronics and Communications
Skills
- Languages: Rust, Solidity, Golang, TypeScript, JavaScript, Python, C/C++
- Technologies: Geth, Ethers.js, viem, EVM, CosmWasm, GTK-rs, Cryptography, Distributed Systems
Work Experience
- Blockchain Developer, Deon Labs (April 2024 - Present)
- Full-Stack Engineer, Freelance (May 2023 - Aug 2023)
Achievements
- Mantra RWA Hackathon Winner
- Artela Use-Case Buildathon Winner
- Track Winner, LNMHacks 6.0";

/// Project file contents are the links the terminal opens.
const PROJECT_LINKS: &[(&str, &str)] = &[
    ("HireSight", "https://github.com/HireSight/Frontend"),
    ("AE-Forge", "https://github.com/Ansh1902396/AE-forge"),
    ("X_Place", "https://github.com/Suryansh-23/X_Place"),
    ("Augmentium", "https://github.com/Ansh1902396/Augmentium"),
    ("On-Chain-Data-Encryption", "https://github.com/Suryansh-23/artela-encryption-aspect"),
    ("KageGroove", "https://github.com/Ansh1902396/KageGroove"),
    ("Drona-AI", "https://dronaai.aviral.software/"),
    ("Cube", "https://github.com/Ansh1902396/Cube-"),
    ("Tetris.rs", "https://github.com/Ansh1902396/tetris"),
];

pub fn filesystem(user: &str) -> Node {
    let projects = PROJECT_LINKS
        .iter()
        .fold(Node::dir(), |dir, (name, url)| dir.with(name, Node::file(url)));
    let social = SOCIALS
        .iter()
        .filter(|s| s.platform != "telegram")
        .fold(Node::dir(), |dir, s| dir.with(s.platform, Node::file(s.url)));
    let documents = Node::dir()
        .with("resume.pdf", Node::file(RESUME_URL))
        .with("notes.txt", Node::file(NOTES))
        .with("resume.txt", Node::file(RESUME_TXT));

    Node::dir()
        .with(
            "home",
            Node::dir().with(
                user,
                Node::dir()
                    .with("projects", projects)
                    .with("documents", documents)
                    .with("social", social)
                    .with(".bashrc", Node::file("Bash configuration file")),
            ),
        )
        .with(
            "etc",
            Node::dir()
                .with("hosts", Node::file("Hosts file"))
                .with("passwd", Node::file("Password file")),
        )
        .with(
            "var",
            Node::dir().with("log", Node::dir().with("system.log", Node::file("System log file"))),
        )
}
