use std::path::PathBuf;

use anyhow::Context;
use career_path::app::App;
use career_path::config::ClientConfig;
use career_path::error::Error;
use career_path::guard::{Decision, Page};
use career_path::onboarding::{OnboardingWizard, StepKind, UploadState};
use career_path::roadmap::{
    self, decode_shared_roadmap, encode_shared_roadmap, render, render_not_found,
};
use career_path::store::{load_json, storage_keys};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;

    // The terminal is the UI, so logs go to a daily file in the data dir.
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(&log_dir, "career-path.log");
    let (writer, _log_guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    eprintln!("Career Path v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Backend: {}",
        config.backend_url.as_deref().unwrap_or("(not configured)")
    );
    eprintln!("   Data: {}", config.data_dir.display());
    eprintln!("   Logs: {}", log_dir.display());
    eprintln!("   Type 'quit' at any prompt to exit.\n");

    let app = App::init(&config).await?;
    let mut terminal = Terminal {
        app,
        lines: BufReader::new(tokio::io::stdin()).lines(),
        pending_email: None,
    };
    terminal.run().await
}

struct Terminal {
    app: App,
    lines: Lines<BufReader<Stdin>>,
    /// Email awaiting verification after signup.
    pending_email: Option<String>,
}

/// What a screen wants next.
enum Next {
    Go(Page),
    Quit,
}

impl Terminal {
    async fn run(&mut self) -> anyhow::Result<()> {
        let mut page = Page::Home;
        loop {
            match self.app.navigate(page).await {
                Decision::Wait => {
                    tokio::task::yield_now().await;
                    continue;
                }
                Decision::Redirect(target) => {
                    tracing::debug!(from = %page, to = %target, "Redirected");
                    page = target;
                    continue;
                }
                Decision::Show => {}
            }

            let next = match page {
                Page::Home => self.home().await?,
                Page::Login => self.login().await?,
                Page::Signup => self.signup().await?,
                Page::Verify => self.verify().await?,
                Page::Onboarding => self.onboarding().await?,
                Page::CareerPath => self.career_path().await?,
            };
            match next {
                Next::Go(target) => page = target,
                Next::Quit => break,
            }
        }
        eprintln!("Bye.");
        Ok(())
    }

    /// Prompt for one line. `None` on EOF or `quit`.
    async fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        eprint!("{prompt} ");
        let Some(line) = self.lines.next_line().await.context("Failed to read stdin")? else {
            return Ok(None);
        };
        let line = line.trim().to_string();
        if line.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        Ok(Some(line))
    }

    async fn home(&mut self) -> anyhow::Result<Next> {
        println!("\nWelcome to Career Path.");
        println!("  1) Log in");
        println!("  2) Sign up");
        println!("  3) Verify email");
        loop {
            let Some(choice) = self.ask(">").await? else {
                return Ok(Next::Quit);
            };
            match choice.as_str() {
                "1" | "login" => return Ok(Next::Go(Page::Login)),
                "2" | "signup" => return Ok(Next::Go(Page::Signup)),
                "3" | "verify" => return Ok(Next::Go(Page::Verify)),
                _ => eprintln!("Pick 1, 2 or 3."),
            }
        }
    }

    async fn login(&mut self) -> anyhow::Result<Next> {
        println!("\nLog in");
        let Some(email) = self.ask("Email:").await? else {
            return Ok(Next::Quit);
        };
        let Some(password) = self.ask("Password:").await? else {
            return Ok(Next::Quit);
        };

        if let Err(e) = self.app.sessions().login(&email, &password).await {
            report(&e);
            return Ok(Next::Go(Page::Home));
        }
        self.land().await
    }

    async fn signup(&mut self) -> anyhow::Result<Next> {
        println!("\nCreate an account");
        let Some(email) = self.ask("Email:").await? else {
            return Ok(Next::Quit);
        };
        let Some(username) = self.ask("Full name:").await? else {
            return Ok(Next::Quit);
        };
        let Some(password) = self.ask("Password (6+ characters):").await? else {
            return Ok(Next::Quit);
        };

        match self.app.sessions().signup(&email, &username, &password).await {
            Ok(_) => {
                println!("Account created. Check {email} for a verification code.");
                self.pending_email = Some(email);
                Ok(Next::Go(Page::Verify))
            }
            Err(e) => {
                report(&e);
                Ok(Next::Go(Page::Home))
            }
        }
    }

    async fn verify(&mut self) -> anyhow::Result<Next> {
        println!("\nVerify your email");
        let email = match self.pending_email.clone() {
            Some(email) => email,
            None => {
                let Some(email) = self.ask("Email:").await? else {
                    return Ok(Next::Quit);
                };
                self.pending_email = Some(email.clone());
                email
            }
        };

        loop {
            let Some(code) = self.ask("6-digit code (or 'resend'):").await? else {
                return Ok(Next::Quit);
            };
            if code.eq_ignore_ascii_case("resend") {
                match self.app.sessions().refresh_otp(&email).await {
                    Ok(_) => println!("A new code is on its way."),
                    Err(e) => report(&e),
                }
                continue;
            }
            match self.app.sessions().verify_code(&email, &code).await {
                Ok(_) => {
                    self.pending_email = None;
                    return self.land().await;
                }
                Err(e) => report(&e),
            }
        }
    }

    /// After authentication: existing roadmap or onboarding.
    async fn land(&mut self) -> anyhow::Result<Next> {
        match self.app.landing_page().await {
            Ok(page) => Ok(Next::Go(page)),
            Err(e) => {
                report(&e);
                Ok(Next::Go(Page::Onboarding))
            }
        }
    }

    async fn onboarding(&mut self) -> anyhow::Result<Next> {
        println!("\nTell us about yourself. Commands: back, logout, quit.");
        loop {
            let wizard = self.app.onboarding().snapshot().await;
            show_step(&wizard);

            if wizard.can_submit() {
                let Some(answer) = self.ask("Generate your career path? [Y/n]").await? else {
                    return Ok(Next::Quit);
                };
                match answer.to_ascii_lowercase().as_str() {
                    "" | "y" | "yes" => {
                        println!("Generating, this can take a minute...");
                        match self.app.onboarding().submit().await {
                            Ok(payload) => {
                                println!("{}", roadmap::render_payload(&payload));
                                return Ok(Next::Go(Page::CareerPath));
                            }
                            Err(e) => report(&e),
                        }
                    }
                    "back" => {
                        self.app.onboarding().prev_step().await;
                    }
                    "logout" => {
                        self.app.logout().await;
                        return Ok(Next::Go(Page::Home));
                    }
                    _ => {}
                }
                continue;
            }

            let Some(input) = self.ask(">").await? else {
                return Ok(Next::Quit);
            };
            match input.as_str() {
                "back" => {
                    self.app.onboarding().prev_step().await;
                    continue;
                }
                "logout" => {
                    self.app.logout().await;
                    return Ok(Next::Go(Page::Home));
                }
                _ => {}
            }

            let step = wizard.current();
            let result = match step.kind {
                StepKind::File => self
                    .app
                    .onboarding()
                    .upload_file(&PathBuf::from(&input))
                    .await
                    .map(|receipt| println!("Uploaded {}.", receipt.file_name)),
                StepKind::Text => {
                    let onboarding = self.app.onboarding();
                    match onboarding.select_option(&input).await {
                        Ok(_) => onboarding.next_step().await.map(|_| ()),
                        Err(e) => Err(e),
                    }
                }
                _ => {
                    // Numbered pick or the option text itself.
                    let value = input
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| step.options.get(i).cloned())
                        .unwrap_or(input);
                    self.app.onboarding().select_option(&value).await.map(|_| ())
                }
            };
            if let Err(e) = result {
                report(&e);
            }
        }
    }

    async fn career_path(&mut self) -> anyhow::Result<Next> {
        match self.app.stored_roadmap().await {
            Some(roadmap) => println!("\n{}", render(&roadmap)),
            None => println!("\n{}", render_not_found()),
        }
        println!("Commands: share <base-url>, open <link>, onboarding, logout, quit.");

        loop {
            let Some(input) = self.ask(">").await? else {
                return Ok(Next::Quit);
            };
            let (command, arg) = input
                .split_once(' ')
                .map(|(c, a)| (c, a.trim()))
                .unwrap_or((input.as_str(), ""));
            match command {
                "onboarding" => {
                    self.app.onboarding().reset().await;
                    return Ok(Next::Go(Page::Onboarding));
                }
                "logout" => {
                    self.app.logout().await;
                    return Ok(Next::Go(Page::Home));
                }
                "share" => {
                    let loaded = load_json::<Value>(self.app.store(), storage_keys::CAREER_PATH);
                    match loaded.await {
                        Ok(Some(payload)) => match encode_shared_roadmap(arg, &payload) {
                            Ok(link) => println!("{link}"),
                            Err(e) => eprintln!("  {e}"),
                        },
                        Ok(None) => eprintln!("  Nothing to share yet."),
                        Err(e) => {
                            tracing::warn!(error = %e, "Stored career path is unreadable");
                            eprintln!("  Could not read the saved career path.");
                        }
                    }
                }
                "open" => match decode_shared_roadmap(arg) {
                    Ok(roadmap) => println!("\n{}", render(&roadmap)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Shared roadmap not usable");
                        println!("\n{}", render_not_found());
                    }
                },
                _ => eprintln!("Unknown command."),
            }
        }
    }
}

fn show_step(wizard: &OnboardingWizard) {
    let index = wizard.current_step();
    let step = wizard.current();
    println!(
        "\n[{}/{}] {}: {}",
        index + 1,
        wizard.steps().len(),
        step.title,
        step.subtitle
    );
    match step.kind {
        StepKind::Text => {
            if let Some(answer) = wizard.answer(index) {
                println!("  (current: {answer})");
            }
            if let Some(placeholder) = &step.placeholder {
                println!("  e.g. {placeholder}");
            }
        }
        StepKind::File => match wizard.upload_state(index) {
            UploadState::Uploaded { file_name, .. } => println!("  Uploaded: {file_name}"),
            UploadState::Failed { reason } => {
                println!("  Last upload failed: {reason}. Enter a path to try again.")
            }
            UploadState::Pending { file_name } => println!("  Uploading {file_name}..."),
            UploadState::Idle => println!("  Enter the path to your resume."),
        },
        _ => {
            let current = wizard.answer(index);
            for (i, option) in step.options.iter().enumerate() {
                let marker = if current == Some(option.as_str()) { "*" } else { " " };
                println!("  {marker}{}) {option}", i + 1);
            }
        }
    }
}

/// Show a failure inline. Auth rejections carry the backend's own message.
fn report(err: &Error) {
    match err {
        Error::Auth(auth) => eprintln!("  {auth}"),
        Error::Wizard(wizard) => eprintln!("  {wizard}"),
        other => eprintln!("  {other}"),
    }
}
