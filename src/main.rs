use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mockchat::capture;
use mockchat::session::{Sender, Session};
use mockchat::theme::Theme;
use mockchat::{CaptureConfig, Device};

#[derive(Parser)]
#[command(name = "mockchat", version, about = "Fake chat-conversation screenshot generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Theme preset to start with
    #[arg(long, value_enum, default_value = "whatsapp")]
    theme: Theme,

    /// Device frame to render into
    #[arg(long, value_enum, default_value = "mobile")]
    device: Device,

    /// Counterpart display name
    #[arg(long)]
    name: Option<String>,

    /// Counterpart avatar: an image file path or a base64 data URI
    #[arg(long)]
    avatar: Option<String>,

    /// Hide the watermark overlay
    #[arg(long)]
    no_watermark: bool,

    /// Directory exported PNGs are written into
    #[arg(long)]
    out: Option<PathBuf>,

    /// Read composer commands from a file instead of the terminal
    /// (use "-" for stdin)
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List the theme catalog
    Themes {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let mut cli = Cli::parse();

    match cli.command.take() {
        Some(Command::Themes { json }) => print_themes(json),
        None => {
            if let Err(e) = run(cli).await {
                eprintln!("mockchat: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_themes(json: bool) {
    let catalog = Theme::catalog();
    if json {
        // Serialization of a plain record list cannot fail
        println!("{}", serde_json::to_string_pretty(&catalog).expect("serialize catalog"));
    } else {
        for entry in catalog {
            println!("{:<12} {:?}", entry.name, entry.layout);
        }
    }
}

async fn run(cli: Cli) -> mockchat::Result<()> {
    let mut session = Session::new();
    session.set_theme(cli.theme);
    session.set_device(cli.device);
    session.set_show_watermark(!cli.no_watermark);
    if let Some(name) = cli.name {
        session.set_their_name(name);
    }
    if let Some(avatar) = &cli.avatar {
        set_avatar(&session, avatar);
    }

    let config = CaptureConfig { out_dir: cli.out, ..Default::default() };

    let interactive = cli.script.is_none();
    let mut reader: Box<dyn BufRead> = match cli.script {
        None => Box::new(BufReader::new(io::stdin())),
        Some(path) if path.as_os_str() == "-" => Box::new(BufReader::new(io::stdin())),
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
    };

    if interactive {
        println!("mockchat: type 'help' for commands");
    }

    let mut line = String::new();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        match cmd {
            "me" => append(&mut session, Sender::Me, rest),
            "them" => append(&mut session, Sender::Them, rest),
            "list" => list(&session),
            "delete" => match rest.parse::<u64>() {
                Ok(id) => {
                    if !session.remove(id) {
                        println!("No message with id {id}.");
                    }
                }
                Err(_) => println!("Usage: delete <id>"),
            },
            "clear" => clear(&mut session, &mut reader, interactive)?,
            "theme" => match rest.parse::<Theme>() {
                Ok(theme) => session.set_theme(theme),
                Err(e) => println!("{e}"),
            },
            "device" => match rest.parse::<Device>() {
                Ok(device) => session.set_device(device),
                Err(e) => println!("{e}"),
            },
            "name" => {
                if rest.is_empty() {
                    println!("Usage: name <text>");
                } else {
                    session.set_their_name(rest);
                }
            }
            "avatar" => {
                if rest.is_empty() {
                    println!("Usage: avatar <path|data-uri>");
                } else {
                    set_avatar(&session, rest);
                }
            }
            "watermark" => match rest {
                "on" => session.set_show_watermark(true),
                "off" => session.set_show_watermark(false),
                _ => println!("Usage: watermark <on|off>"),
            },
            "save" => save(&session, rest, &config).await,
            "help" => help(),
            "quit" | "exit" => break,
            _ => println!("Unknown command '{cmd}'; type 'help' for commands."),
        }
    }

    Ok(())
}

fn append(session: &mut Session, sender: Sender, text: &str) {
    session.input = text.to_string();
    if session.submit(sender).is_none() {
        // Blank input is silently ignored, matching the composer UI
        log::debug!("ignored blank message");
    }
}

fn list(session: &Session) {
    if session.is_empty() {
        println!("No messages yet.");
        return;
    }
    println!(
        "theme={} device={} them={} avatar={} watermark={}",
        session.theme(),
        session.device(),
        session.their_name(),
        session.avatar.label(),
        if session.show_watermark() { "on" } else { "off" },
    );
    for msg in session.messages() {
        let who = match msg.sender {
            Sender::Me => "me  ",
            Sender::Them => "them",
        };
        println!("[{:>3}] {} {}  {}", msg.id, who, msg.timestamp, msg.text);
    }
}

fn clear(
    session: &mut Session,
    reader: &mut Box<dyn BufRead>,
    interactive: bool,
) -> io::Result<()> {
    if session.is_empty() {
        println!("Nothing to clear.");
        return Ok(());
    }
    if interactive {
        print!("Clear all messages? [y/N] ");
        io::stdout().flush()?;
    }
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    if session.clear_all(|| confirmed) {
        println!("Conversation cleared.");
    } else {
        println!("Kept the conversation.");
    }
    Ok(())
}

fn set_avatar(session: &Session, reference: &str) {
    if reference.starts_with("data:") {
        session.avatar.upload_data_uri(reference);
    } else {
        session.avatar.upload(PathBuf::from(reference));
    }
}

async fn save(session: &Session, rest: &str, config: &CaptureConfig) {
    let result = if rest.is_empty() {
        capture::capture(Some(session), config).await
    } else {
        let path = PathBuf::from(rest);
        capture::capture_into(session, &path, config).await.map(|()| Some(path))
    };
    match result {
        Ok(Some(path)) => println!("Saved {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            log::error!("capture failed: {e}");
            println!("Capture failed. Try again; restart the session if this persists.");
        }
    }
}

fn help() {
    println!(
        "\
Commands:
  me <text>          append a message from you
  them <text>        append a message from the counterpart
  list               show the conversation and current settings
  delete <id>        remove one message
  clear              remove all messages (asks for confirmation)
  theme <name>       switch theme (see 'mockchat themes')
  device <frame>     mobile or desktop
  name <text>        set the counterpart's display name
  avatar <ref>       set their avatar from a file path or data URI
  watermark <on|off> toggle the watermark overlay
  save [path]        export the mockup as a PNG
  quit               leave"
    );
}
