use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use swipematch_autoplay::{run_session, write_json, write_text, AutoplayConfig, SessionResult};
use swipematch_core::{
    CandidateCard, DragRelease, EngineConfig, EscalationPolicy, Event, EventBus, MatchSummary,
    ProfileDraft, Program, SessionPhase, SurveyAnswers, SurveyDraft, SwipeDirection, SwipeSession,
    UserProfile, SURVEY_QUESTIONS,
};
use swipematch_data::{
    builtin_catalog, builtin_engine_config, load_catalog, load_engine_config, LoadedCatalog,
};
use swipematch_services::{
    generated_cards_or_empty, persona_or_fallback, DeckGenerator, DisabledGenerator, GeminiClient,
    PersonaGenerator, ServiceConfig, SheetSync, SurveyLog, SurveyRecord, SyncPayload,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_AUTO_SEED: u64 = 0xC0FFEE;
const SYNC_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
struct CliOptions {
    auto: bool,
    seed: Option<u64>,
    policy: Option<EscalationPolicy>,
    program: Option<Program>,
    assets: Option<PathBuf>,
    export: Option<PathBuf>,
    right_ratio: Option<u32>,
    generate: bool,
    verbose: bool,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        generate: true,
        ..CliOptions::default()
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1);
        let mut takes_value = true;
        match args[idx].as_str() {
            "--seed" => options.seed = value.and_then(|value| value.parse::<u64>().ok()),
            "--policy" => {
                options.policy = value.and_then(|value| EscalationPolicy::from_label(value))
            }
            "--program" => options.program = value.and_then(|value| Program::from_label(value)),
            "--assets" => options.assets = value.map(PathBuf::from),
            "--export" => options.export = value.map(PathBuf::from),
            "--right-ratio" => {
                options.right_ratio = value.and_then(|value| value.parse::<u32>().ok())
            }
            other => {
                takes_value = false;
                match other {
                    "--auto" => options.auto = true,
                    "--no-generate" => options.generate = false,
                    "--verbose" | "-v" => options.verbose = true,
                    _ => eprintln!("ignoring unknown argument '{other}'"),
                }
            }
        }
        if takes_value && value.is_some() {
            idx += 1;
        }
        idx += 1;
    }
    options
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    init_tracing(options.verbose);
    let result = if options.auto {
        run_auto(&options)
    } else {
        run_interactive(&options)
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn load_sources(options: &CliOptions) -> Result<(LoadedCatalog, EngineConfig)> {
    let (loaded, mut engine) = match &options.assets {
        Some(dir) => (load_catalog(dir)?, load_engine_config(dir)?),
        None => (builtin_catalog(), builtin_engine_config()),
    };
    if let Some(policy) = options.policy {
        engine.policy = policy;
    }
    Ok((loaded, engine))
}

fn run_auto(options: &CliOptions) -> Result<()> {
    let (loaded, engine) = load_sources(options)?;
    let defaults = AutoplayConfig::default();
    let config = AutoplayConfig {
        seed: options.seed.unwrap_or(DEFAULT_AUTO_SEED),
        right_ratio: options.right_ratio.unwrap_or(defaults.right_ratio),
        ..defaults
    };
    let program = options.program.unwrap_or(Program::HealthCare);
    let result = run_session(Arc::new(loaded.catalog), engine, program, config)?;
    print!("{}", result.to_text_report());
    if let Some(path) = &options.export {
        write_report(path, &result)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn write_report(path: &Path, result: &SessionResult) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        write_json(path, result)?;
    } else {
        write_text(path, result)?;
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(DEFAULT_AUTO_SEED)
}

fn run_interactive(options: &CliOptions) -> Result<()> {
    let (loaded, engine) = load_sources(options)?;
    let catalog = Arc::new(loaded.catalog);
    let services = ServiceConfig::from_env();
    let client = if !options.generate {
        None
    } else if !services.generation_enabled() {
        info!("no SWIPEMATCH_API_KEY set; using the catalog only");
        None
    } else {
        GeminiClient::from_config(&services).unwrap_or_else(|err| {
            warn!(error = %err, "text generation disabled");
            None
        })
    };
    let disabled = DisabledGenerator;
    let deck_generator: &dyn DeckGenerator = match &client {
        Some(client) => client,
        None => &disabled,
    };
    let persona_generator: &dyn PersonaGenerator = match &client {
        Some(client) => client,
        None => &disabled,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    println!("== Career Matches ==");
    println!("Swipe right on roles you could fall for. Five matches ends the round.");
    let Some(profile) = prompt_profile(&loaded.avatars) else {
        return Ok(());
    };

    if client.is_some() {
        println!("Tailoring a few roles for {}...", profile.name);
    }
    let generated = runtime.block_on(generated_cards_or_empty(
        deck_generator,
        &profile,
        &catalog,
        services.generator_timeout,
    ));

    let mut events = EventBus::default();
    let seed = options.seed.unwrap_or_else(clock_seed);
    let mut session = SwipeSession::with_generated(
        catalog.clone(),
        engine,
        profile.program,
        generated,
        seed,
        &mut events,
    )?;
    drain_events(&mut events);
    print_help();
    if !run_swipes(&mut session, &mut events) {
        println!("See you next time.");
        return Ok(());
    }

    let matches = session.matches().to_vec();
    print_summary(&session.summary());

    let Some(answers) = prompt_survey() else {
        return Ok(());
    };

    let sync = SheetSync::new(services.sheet_url.clone());
    let pending_sync = {
        let _guard = runtime.enter();
        sync.dispatch(SyncPayload::new(&profile, &matches, answers.to_draft()))
    };

    println!("Reading your matches...");
    let persona = runtime.block_on(persona_or_fallback(
        persona_generator,
        &profile,
        &matches,
        services.generator_timeout,
    ));
    println!();
    println!("== Your career persona ==");
    println!("{}", persona.title);
    println!("{}", persona.analysis);

    let mut log = SurveyLog::default();
    log.push(SurveyRecord::new(profile, &matches, answers));
    if let Some(path) = &options.export {
        log.append_csv(path)?;
        println!("survey saved to {}", path.display());
    }

    if let Some(handle) = pending_sync {
        runtime.block_on(async {
            if tokio::time::timeout(SYNC_GRACE, handle).await.is_err() {
                warn!("sync still running at exit; abandoning it");
            }
        });
    }
    runtime.shutdown_timeout(Duration::from_millis(200));
    Ok(())
}

/// Returns `false` when the user quits before five matches.
fn run_swipes(session: &mut SwipeSession, events: &mut EventBus) -> bool {
    loop {
        match session.phase() {
            SessionPhase::Completed => return true,
            SessionPhase::Refilling => {
                println!("Finding more roles...");
                std::thread::sleep(Duration::from_millis(session.config().refill_delay_ms));
                if let Err(err) = session.refill(events) {
                    eprintln!("could not restock the deck: {err}");
                    return false;
                }
                drain_events(events);
                continue;
            }
            SessionPhase::Priming | SessionPhase::Active => {}
        }
        let Some(card) = session.top() else {
            eprintln!("no card to show");
            return false;
        };
        print_card(card);
        let Some(line) = read_line(&prompt_text(session)) else {
            return false;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let outcome = match cmd {
            "l" | "left" | "n" | "pass" => session.swipe(SwipeDirection::Left, events).map(|_| ()),
            "r" | "right" | "y" | "like" => {
                session.swipe(SwipeDirection::Right, events).map(|_| ())
            }
            "drag" | "d" => match parse_drag(&args) {
                Ok(release) => session.swipe_gesture(release, events).map(|result| {
                    if result.is_none() {
                        println!("(snapped back)");
                    }
                }),
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
            "matches" | "m" => {
                print_matches(session.matches());
                continue;
            }
            "help" | "h" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" | "q" => return false,
            _ => {
                println!("unknown command '{cmd}', type 'help'");
                continue;
            }
        };
        if let Err(err) = outcome {
            println!("swipe rejected: {err}");
        }
        drain_events(events);
    }
}

fn parse_drag(args: &[&str]) -> Result<DragRelease, String> {
    let [offset, velocity] = args else {
        return Err("usage: drag <offset_x> <velocity_x>".to_string());
    };
    let offset_x = offset
        .parse::<f64>()
        .map_err(|_| format!("invalid offset '{offset}'"))?;
    let velocity_x = velocity
        .parse::<f64>()
        .map_err(|_| format!("invalid velocity '{velocity}'"))?;
    Ok(DragRelease {
        offset_x,
        velocity_x,
    })
}

fn prompt_text(session: &SwipeSession) -> String {
    format!(
        "[{} | {}/{} matches | {} left] > ",
        session.tier().label(),
        session.matches().len(),
        session.config().match_cap,
        session.deck().len()
    )
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
}

fn prompt_field(label: &str) -> Option<String> {
    loop {
        let value = read_line(&format!("{label}: "))?;
        if !value.trim().is_empty() {
            return Some(value);
        }
        println!("  {label} is required");
    }
}

/// Numbered menu; accepts the number or the option text.
fn prompt_choice(label: &str, options: &[&str]) -> Option<usize> {
    println!("{label}");
    for (idx, option) in options.iter().enumerate() {
        println!("  {}) {option}", idx + 1);
    }
    loop {
        let value = read_line("> ")?;
        match parse_choice(&value, options) {
            Some(idx) => return Some(idx),
            None => println!("  pick 1-{}", options.len()),
        }
    }
}

fn parse_choice(value: &str, options: &[&str]) -> Option<usize> {
    let value = value.trim();
    if let Ok(number) = value.parse::<usize>() {
        return (1..=options.len()).contains(&number).then(|| number - 1);
    }
    options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(value))
}

fn prompt_profile(avatars: &[String]) -> Option<UserProfile> {
    let programs: Vec<&str> = Program::ALL.iter().map(|program| program.label()).collect();
    loop {
        let mut draft = ProfileDraft {
            name: prompt_field("Your name")?,
            ..ProfileDraft::default()
        };
        let program = prompt_choice("Your program", &programs)?;
        draft.program = Some(Program::ALL[program]);
        draft.passions[0] = prompt_field("First passion")?;
        draft.passions[1] = prompt_field("Second passion")?;
        draft.strength = prompt_field("Your superpower")?;
        draft.happiness = prompt_field("What makes you happy at work")?;
        draft.avatar = if avatars.is_empty() {
            prompt_field("Avatar image URL")?
        } else {
            let labels: Vec<&str> = avatars.iter().map(String::as_str).collect();
            let idx = prompt_choice("Pick an avatar", &labels)?;
            avatars[idx].clone()
        };
        match draft.finish() {
            Ok(profile) => return Some(profile),
            Err(err) => println!("profile incomplete ({err}), let's try again"),
        }
    }
}

fn prompt_survey() -> Option<SurveyAnswers> {
    println!();
    println!("== Quick survey ==");
    loop {
        let mut draft = SurveyDraft::default();
        for question in &SURVEY_QUESTIONS {
            let answer = if question.options.is_empty() {
                read_line(&format!("{} (optional): ", question.text))?
            } else {
                let idx = prompt_choice(question.text, question.options)?;
                question.options[idx].to_string()
            };
            let needs_other = answer == "Others";
            set_answer(&mut draft, question.id, answer);
            if needs_other {
                let other = prompt_field("Tell us more")?;
                set_answer(&mut draft, &format!("{}_other", question.id), other);
            }
        }
        match draft.finish() {
            Ok(answers) => return Some(answers),
            Err(err) => println!("survey incomplete ({err}), let's try again"),
        }
    }
}

fn set_answer(draft: &mut SurveyDraft, id: &str, value: String) {
    let slot = match id {
        "q1" => &mut draft.q1,
        "q2" => &mut draft.q2,
        "q3" => &mut draft.q3,
        "q3_other" => &mut draft.q3_other,
        "q4" => &mut draft.q4,
        "q5" => &mut draft.q5,
        "q6" => &mut draft.q6,
        "q6_other" => &mut draft.q6_other,
        "q7" => &mut draft.q7,
        _ => return,
    };
    *slot = value;
}

fn print_help() {
    println!("Commands:");
    println!("  r|right|y                swipe right (match)");
    println!("  l|left|n                 swipe left (pass)");
    println!("  drag <offset> <velocity> release a drag; small drags snap back");
    println!("  matches|m                list matches so far");
    println!("  help|h|?                 show help");
    println!("  quit|exit|q              leave the session");
}

fn print_card(card: &CandidateCard) {
    println!();
    let origin = if card.generated { "  (picked for you)" } else { "" };
    println!("== {} =={origin}", card.title);
    println!("{} | {}", card.archetype.label(), card.location);
    println!("{}", card.bio);
    println!("looking for: {}", card.looking_for);
    println!("skills: {}", card.skills.join(", "));
    println!("love language: {}", card.compatibility.join(", "));
    println!("swipe right if: {}", card.swipe_right_if.join(", "));
    println!("fun fact: {}", card.fun_fact);
    let tags: Vec<String> = card.tags.iter().map(|tag| format!("#{tag}")).collect();
    println!("{}", tags.join(" "));
}

fn print_matches(matches: &[CandidateCard]) {
    if matches.is_empty() {
        println!("no matches yet");
        return;
    }
    for (idx, card) in matches.iter().enumerate() {
        println!("  {}. {} ({})", idx + 1, card.title, card.archetype.label());
    }
}

fn print_summary(summary: &MatchSummary) {
    println!();
    println!("== It's a match! ==");
    for (idx, line) in summary.matches.iter().enumerate() {
        println!("  {}. {} ({})", idx + 1, line.title, line.archetype.label());
    }
    if !summary.skills.is_empty() {
        println!("skills to grow: {}", summary.skills.join(", "));
    }
}

fn drain_events(events: &mut EventBus) {
    for event in events.drain() {
        if let Some(line) = format_event(&event) {
            println!("{line}");
        }
    }
}

fn format_event(event: &Event) -> Option<String> {
    match event {
        Event::SessionPrimed { cards, generated } if *generated > 0 => Some(format!(
            "deck ready: {cards} roles, {generated} picked for you"
        )),
        Event::SessionPrimed { cards, .. } => Some(format!("deck ready: {cards} roles")),
        Event::CardSwiped { .. } => None,
        Event::CardMatched { matches, .. } => Some(format!("it's a match! ({matches} so far)")),
        Event::DeckExhausted { .. } => None,
        Event::DeckRefilled { tier, cards } => {
            Some(format!("new roles: {cards} from {}", tier.label()))
        }
        Event::SessionCompleted { swipes, .. } => {
            Some(format!("round complete after {swipes} swipes"))
        }
    }
}
