use std::io::{self, IsTerminal, Read};

use soundlaw::{
    CharGroup, Direction, GroupTable, Pass, RawRuleInput, RuleKind, apply_rule_set,
    validate_and_compile,
};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let rule = match validate_and_compile(&config.rule, &config.groups) {
        Ok(rule) => rule,
        Err(errors) => {
            for message in errors.messages() {
                eprintln!("error: {message}");
            }
            std::process::exit(2);
        }
    };

    let rules = [rule];
    for word in &config.words {
        println!("{}", apply_rule_set(&rules, word, config.pass));
    }
}

struct CliConfig {
    rule: RawRuleInput,
    groups: GroupTable,
    words: Vec<String>,
    pass: Pass,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut seek: Option<String> = None;
    let mut replace: Option<String> = None;
    let mut context: Option<String> = None;
    let mut anticontext: Option<String> = None;
    let mut kind = RuleKind::SoundChange;
    let mut direction: Option<Direction> = None;
    let mut pass = Pass::Forward;
    let mut groups = GroupTable::new();
    let mut words: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("soundlaw {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--seek" | "-s" => {
                seek = Some(args.next().ok_or("error: --seek expects a value")?);
            }
            "--replace" | "-r" => {
                replace = Some(args.next().ok_or("error: --replace expects a value")?);
            }
            "--context" => {
                context = Some(args.next().ok_or("error: --context expects a value")?);
            }
            "--anticontext" => {
                anticontext = Some(args.next().ok_or("error: --anticontext expects a value")?);
            }
            "--kind" => {
                let value = args.next().ok_or("error: --kind expects a value")?;
                kind = parse_kind(&value)?;
            }
            "--direction" => {
                let value = args.next().ok_or("error: --direction expects a value")?;
                direction = Some(parse_direction(&value)?);
            }
            "--group" | "-g" => {
                let value = args.next().ok_or("error: --group expects LABEL=MEMBERS")?;
                let group = parse_group(&value)?;
                groups.insert(group).map_err(|e| format!("error: {e}"))?;
            }
            "--reverse" => pass = Pass::Reverse,
            "--" => {
                words.extend(args);
                break;
            }
            other if other.starts_with('-') => {
                return Err(format!("error: unknown flag {other} (try --help)"));
            }
            word => words.push(word.to_string()),
        }
    }

    let seek = seek.ok_or("error: --seek is required")?;
    let replace = replace.unwrap_or_default();

    if words.is_empty() && !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("error: failed to read stdin: {e}"))?;
        words.extend(buf.split_whitespace().map(str::to_string));
    }
    if words.is_empty() {
        return Err("error: no input words (pass them as arguments or on stdin)".to_string());
    }

    let mut rule = RawRuleInput::new("cli", kind, seek, replace);
    rule.context = context;
    rule.anticontext = anticontext;
    rule.direction = direction;

    Ok(CliConfig { rule, groups, words, pass })
}

fn parse_kind(value: &str) -> Result<RuleKind, String> {
    match value {
        "sound-change" => Ok(RuleKind::SoundChange),
        "transform" => Ok(RuleKind::Transform),
        "stem" => Ok(RuleKind::Stem),
        other => Err(format!("error: unknown kind {other:?} (sound-change, transform, stem)")),
    }
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    match value {
        "both" => Ok(Direction::Both),
        "double" => Ok(Direction::Double),
        "in" => Ok(Direction::In),
        "out" => Ok(Direction::Out),
        other => Err(format!("error: unknown direction {other:?} (both, double, in, out)")),
    }
}

fn parse_group(value: &str) -> Result<CharGroup, String> {
    let (label, members) = value
        .split_once('=')
        .ok_or_else(|| format!("error: --group expects LABEL=MEMBERS, got {value:?}"))?;
    let mut chars = label.chars();
    let (Some(label), None) = (chars.next(), chars.next()) else {
        return Err("error: group label must be a single character".to_string());
    };
    let members: Vec<&str> = if members.contains(',') {
        members.split(',').collect()
    } else {
        // Without commas, each character is its own member.
        return Ok(CharGroup::new(label, members.chars().map(String::from)));
    };
    Ok(CharGroup::new(label, members))
}

fn print_help() {
    println!(
        "soundlaw {} - apply a pattern-based transformation rule to words

USAGE:
    soundlaw --seek PATTERN [--replace TEMPLATE] [OPTIONS] [WORD]...

If no words are given, whitespace-separated words are read from stdin.

OPTIONS:
    -s, --seek PATTERN        search pattern (may use %L group references)
    -r, --replace TEMPLATE    replacement template ($1, $2, ... captures)
        --context CTX         required surrounding context, e.g. %V_%V or _#
        --anticontext CTX     disqualifying context of the same grammar
    -g, --group LABEL=MEMBERS character group, e.g. -g V=aeiou or -g P=p,t,k
        --kind KIND           sound-change (default), transform, or stem
        --direction DIR       both, double, in, or out (transform only)
        --reverse             run the reverse pass of a transform pipeline
    -h, --help                print this help
    -V, --version             print version

Set SOUNDLAW_DEBUG_RULES=1 to print compilation and application traces.",
        env!("CARGO_PKG_VERSION")
    );
}
