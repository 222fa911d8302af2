//! Bracket and result printing shared by the commands
//!
//! Level 4 - Formatting utilities

use playoffs_core::{Conference, PlayInGame, PlayoffBracket, PlayoffSeries, SeededTeam, SeriesRound};
use playoffs_sim::PostseasonSummary;

use crate::league::TeamDirectory;

const CONFERENCE_ROUNDS: [(SeriesRound, &str); 3] = [
    (SeriesRound::FirstRound, "First Round"),
    (SeriesRound::ConferenceSemis, "Conference Semifinals"),
    (SeriesRound::ConferenceFinals, "Conference Finals"),
];

/// Print the whole bracket as text
pub fn print_bracket(bracket: &PlayoffBracket, directory: &TeamDirectory) {
    println!("\n=== {} Postseason ({:?}) ===", bracket.season(), bracket.phase());

    for conference in Conference::ALL {
        println!("\n--- {} ---", conference);

        println!("Play-In:");
        for game in bracket.play_in().bracket(conference).games() {
            println!("  {}", play_in_line(game, directory));
        }

        let conf = bracket.conference(conference);
        for (round, title) in CONFERENCE_ROUNDS {
            let series = conf.round_series(round);
            if series.is_empty() {
                continue;
            }
            println!("{}:", title);
            for s in series {
                println!("  {}", series_line(s, directory));
            }
        }
    }

    if let Some(finals) = bracket.finals() {
        println!("\n--- Finals ---");
        println!("  {}", series_line(finals, directory));
    }

    if let (Some(champion), Some(runner_up)) = (bracket.champion().team(), bracket.runner_up().team()) {
        println!(
            "\nChampion: {} (def. {})",
            directory.name(champion),
            directory.name(runner_up)
        );
    }
}

/// One play-in game, e.g. "7v8: (7) BOS 110 - 100 (8) MIA"
fn play_in_line(game: &PlayInGame, directory: &TeamDirectory) -> String {
    let side = |team: Option<SeededTeam>| match team {
        Some(t) => format!("({}) {}", t.seed, directory.abbreviation(t.team)),
        None => "TBD".to_string(),
    };
    match game.score {
        Some(score) => format!(
            "{}: {} {} - {} {}",
            game.game_type.label(),
            side(game.higher),
            score.higher,
            score.lower,
            side(game.lower)
        ),
        None => format!(
            "{}: {} vs {}",
            game.game_type.label(),
            side(game.higher),
            side(game.lower)
        ),
    }
}

/// One series, e.g. "(1) BOS vs (8) MIA: BOS leads 3-1"
fn series_line(series: &PlayoffSeries, directory: &TeamDirectory) -> String {
    let (higher, lower) = (series.higher(), series.lower());
    let mut line = format!(
        "({}) {} vs ({}) {}: {}",
        higher.seed,
        directory.abbreviation(higher.team),
        lower.seed,
        directory.abbreviation(lower.team),
        series.status_string(|team| directory.abbreviation(team))
    );
    if series.is_game7() && !series.is_complete() {
        line.push_str(" [Game 7]");
    } else if series.is_elimination_game() {
        line.push_str(" [elimination game]");
    }
    line
}

/// Print a finished run as JSON
pub fn print_json_summary(summary: &PostseasonSummary, directory: &TeamDirectory) {
    #[derive(serde::Serialize)]
    struct JsonSeries {
        series: String,
        winner: String,
        loser: String,
        result: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        season: String,
        champion: String,
        runner_up: String,
        play_in_games: u32,
        series_games: u32,
        series: Vec<JsonSeries>,
    }

    let output = JsonOutput {
        season: summary.season.clone(),
        champion: directory.name(summary.champion),
        runner_up: directory.name(summary.runner_up),
        play_in_games: summary.play_in_games,
        series_games: summary.series_games,
        series: summary
            .series
            .iter()
            .map(|s| JsonSeries {
                series: s.id.to_string(),
                winner: directory.abbreviation(s.winner),
                loser: directory.abbreviation(s.loser),
                result: format!("{}-{}", s.winner_wins, s.loser_wins),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}
