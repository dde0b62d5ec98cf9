use std::path::PathBuf;

use clap::{Parser, Subcommand};

use decamp::calendar::{CalendarRegistry, DateParts, Interval};
use decamp::campaign::Campaign;
use decamp::config::CampaignConfig;
use decamp::events::{AttributeMod, EventResult};
use decamp::party::AttributeValue;
use decamp::ruleset::RulesetRegistry;
use decamp::scenario::Scenario;
use decamp::{logging, Result, Timestamp};

#[derive(Parser, Debug)]
#[command(name = "decamp")]
#[command(about = "Campaign calendars and event timeline replay for tabletop RPGs")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bundled calendars with their default start date
    Calendars,

    /// Encode a date and print it back
    Date {
        #[arg(short, long, default_value = "Gregorian")]
        calendar: String,

        #[arg(short, long, allow_hyphen_values = true)]
        year: i64,

        #[arg(short, long, default_value = "1")]
        month: u32,

        /// Week of the month (used at week precision)
        #[arg(short, long)]
        week: Option<i64>,

        #[arg(short, long, default_value = "1")]
        day: i64,

        #[arg(long, default_value = "0")]
        hour: u32,

        #[arg(long, default_value = "0")]
        minute: u32,

        #[arg(long, default_value = "0")]
        second: u32,

        /// year, month, week, day, time, hour, minute or second
        #[arg(short, long, default_value = "day")]
        precision: Interval,
    },

    /// Shift a calendar's default date by some amount of a unit
    Shift {
        #[arg(short, long, default_value = "Gregorian")]
        calendar: String,

        #[arg(short, long, allow_hyphen_values = true)]
        amount: i64,

        #[arg(short, long, default_value = "day")]
        unit: Interval,
    },

    /// Walk through an insert-into-the-past replay, printing the party
    Demo {
        #[arg(short, long, default_value = "Campaign")]
        calendar: String,
    },

    /// Replay a JSON scenario and print the resulting party
    Replay {
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let calendars = CalendarRegistry::default();
    let rulesets = RulesetRegistry::default();

    match args.command {
        Command::Calendars => {
            for name in calendars.names() {
                println!("{:<18} {}", name, calendars.default_timestamp(name)?);
            }
        }
        Command::Date { calendar, year, month, week, day, hour, minute, second, precision } => {
            let cal = calendars.get(&calendar)?;
            let mut parts = DateParts::new(year, month, day)
                .at(hour, minute, second)
                .with_week_length(cal.week_length());
            if let Some(week) = week {
                parts = parts.in_week(week);
            }
            let ts = Timestamp::new(cal, &parts, precision)?;
            println!("{}", ts);
            println!("  scalar:  {}", ts.value());
            println!("  weekday: {}", ts.weekday().unwrap_or("-"));
        }
        Command::Shift { calendar, amount, unit } => {
            let start = calendars.default_timestamp(&calendar)?;
            let end = start.add(amount, unit)?;
            println!("{}", start);
            println!("{}", end);
            println!("  elapsed: {}", (&end - &start).describe(true));
        }
        Command::Demo { calendar } => demo(&calendar, &calendars, &rulesets)?,
        Command::Replay { scenario } => {
            let scenario = Scenario::load(&scenario)?;
            let campaign = scenario.run(&calendars, &rulesets)?;
            print_party(&campaign);
        }
    }
    Ok(())
}

fn demo(calendar: &str, calendars: &CalendarRegistry, rulesets: &RulesetRegistry) -> Result<()> {
    let config = CampaignConfig {
        name: "Demo".to_string(),
        calendar: calendar.to_string(),
        ..CampaignConfig::default()
    };
    let mut campaign = Campaign::from_config(&config, calendars, rulesets)?;
    let gm = campaign.gm().to_string();
    let t0 = campaign.get_timestamp().clone();
    let day1 = t0.add(1, Interval::Day)?;
    let day2 = t0.add(2, Interval::Day)?;
    let half = t0.add(12, Interval::Hour)?;

    let arrival = campaign
        .new_event("Generic", &gm)?
        .with_title("Aria joins")
        .with_result(EventResult::character_add(
            &gm,
            campaign.new_character("Aria").with_attribute("HP", AttributeValue::Int(10)),
        ));
    campaign.add_event(&day1, arrival)?;
    campaign.advance_to(&day2)?;
    print_party(&campaign);

    campaign.rewind_to(&t0)?;
    print_party(&campaign);

    let scout = campaign
        .new_event("Generic", &gm)?
        .with_title("Borin scouts ahead")
        .with_result(EventResult::character_add(&gm, campaign.new_character("Borin")))
        .with_result(EventResult::character_edit(
            &gm,
            "Borin",
            vec![AttributeMod::Replacement {
                key: "Notes".to_string(),
                value: AttributeValue::Str("found the ford".to_string()),
            }],
        ));
    campaign.add_event(&half, scout)?;
    print_party(&campaign);

    campaign.advance_to(&day2)?;
    print_party(&campaign);

    println!("Timeline:");
    for event in campaign.events_between(&t0, &day2) {
        let at = event.timestamp().map(|t| t.to_string()).unwrap_or_default();
        println!("  {:<36} {}", at, event.title);
    }
    Ok(())
}

fn print_party(campaign: &Campaign) {
    let party = campaign.get_party();
    println!("{} ({} in party)", campaign.get_timestamp(), party.len());
    for (key, character) in party {
        let attributes: Vec<String> = character
            .attributes()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("  {:<12} {}", key, attributes.join(" "));
    }
}
