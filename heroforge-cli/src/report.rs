use anyhow::Result;
use colored::Colorize;
use heroforge_game::{BuildSnapshot, Characteristic, Pool};
use serde::Serialize;
use std::io::Write;

use crate::script::RejectedStep;

#[derive(Serialize)]
struct JsonReport<'a> {
    snapshot: &'a BuildSnapshot,
    rejected: &'a [RejectedStep],
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    snapshot: &BuildSnapshot,
    rejected: &[RejectedStep],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&JsonReport { snapshot, rejected })?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

fn label_or_dash(value: Option<&str>) -> String {
    value.map_or_else(|| "-".to_string(), str::to_string)
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    snapshot: &BuildSnapshot,
    rejected: &[RejectedStep],
) -> Result<()> {
    let identity = &snapshot.identity;
    writeln!(out, "{}", "Character Sheet".bright_cyan().bold())?;
    writeln!(out, "{}", "===============".cyan())?;
    if !identity.name.is_empty() {
        writeln!(out, "Name: {}", identity.name.bold())?;
    }
    if let Some(age) = identity.age {
        writeln!(out, "Age: {age}")?;
    }
    writeln!(out, "Seed: {}", snapshot.seed)?;
    writeln!(
        out,
        "Culture: {}  Career: {}  Age bracket: {}",
        label_or_dash(snapshot.culture.as_ref().map(|c| c.name.as_str())),
        label_or_dash(snapshot.career.as_ref().map(|c| c.name.as_str())),
        label_or_dash(snapshot.age.as_ref().map(|a| a.name.as_str())),
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "Characteristics".bright_yellow().bold())?;
    let line: Vec<String> = Characteristic::ALL
        .iter()
        .map(|which| format!("{which} {:>2}", snapshot.characteristics.get(*which)))
        .collect();
    writeln!(out, "  {}", line.join("  "))?;
    if let Some(point_buy) = snapshot.point_buy {
        writeln!(
            out,
            "  Point-buy: {}/{} spent, {} left",
            point_buy.spent, point_buy.budget, point_buy.remaining
        )?;
    }
    writeln!(out)?;

    let derived = &snapshot.derived;
    writeln!(out, "{}", "Attributes".bright_yellow().bold())?;
    writeln!(
        out,
        "  Damage {}  Experience {:+}  Healing {}  Luck {}  Magic {}  Initiative {}  Actions {}",
        derived.damage_modifier,
        derived.experience_modifier,
        derived.healing_rate,
        derived.luck_points,
        derived.magic_points,
        derived.initiative_bonus,
        derived.action_points,
    )?;
    let hp = derived.hit_points;
    writeln!(
        out,
        "  Hit points: head {}  chest {}  abdomen {}  arms {}  legs {}",
        hp.head, hp.chest, hp.abdomen, hp.arm, hp.leg
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "Skills".bright_yellow().bold())?;
    writeln!(
        out,
        "  {:<34} {:>4} {:>4} {:>4} {:>4} {:>5}",
        "", "base", "cul", "car", "bon", "total"
    )?;
    for row in &snapshot.skills {
        let name = if row.standard {
            row.name.normal()
        } else {
            row.name.italic()
        };
        writeln!(
            out,
            "  {:<34} {:>4} {:>4} {:>4} {:>4} {:>5}",
            name,
            row.base,
            row.culture,
            row.career,
            row.bonus,
            row.total.to_string().bold()
        )?;
    }
    for pool in Pool::ALL {
        if let Some(status) = snapshot.pool(pool) {
            let remaining = if status.remaining == 0 {
                status.remaining.to_string().green()
            } else {
                status.remaining.to_string().yellow()
            };
            writeln!(
                out,
                "  {pool} pool: {}/{} spent, {remaining} left",
                status.spent, status.total
            )?;
        }
    }
    writeln!(
        out,
        "  Combat style: {}  Bonus skill: {}",
        label_or_dash(snapshot.combat_style.as_deref()),
        label_or_dash(snapshot.bonus_skill.as_deref())
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "Equipment".bright_yellow().bold())?;
    writeln!(
        out,
        "  Social class: {}  Starting money: {}  Remaining: {}",
        label_or_dash(snapshot.social_class.as_deref()),
        snapshot.starting_money,
        snapshot.remaining_money
    )?;
    for item in &snapshot.purchases {
        writeln!(out, "  • {} ({})", item.name, item.cost)?;
    }

    if !rejected.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Rejected steps".red().bold())?;
        for step in rejected {
            writeln!(out, "  #{}: {}", step.index, step.rejection.to_string().red())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heroforge_game::BuildSession;

    fn sample() -> BuildSnapshot {
        let mut session = BuildSession::with_defaults(21);
        session.set_culture("barbarian").unwrap();
        session.set_age("adult").unwrap();
        session.roll_starting_money(Some("Freeman")).unwrap();
        session.purchase("dagger").unwrap();
        session.snapshot()
    }

    #[test]
    fn console_report_lists_sections() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &sample(), &[]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Character Sheet"));
        assert!(text.contains("Culture: Barbarian  Career: -  Age bracket: Adult"));
        assert!(text.contains("Combat Style (Raider)"));
        assert!(text.contains("culture pool: 0/100 spent, 100 left"));
        assert!(text.contains("• Dagger (30)"));
        assert!(!text.contains("Rejected steps"));
    }

    #[test]
    fn json_report_wraps_snapshot_and_rejections() {
        let snapshot = sample();
        let rejected = vec![RejectedStep {
            index: 4,
            command: heroforge_game::Command::RollAge,
            rejection: heroforge_game::Rejection::MissingContext {
                kind: heroforge_game::ReferenceKind::AgeBracket,
            },
        }];
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &snapshot, &rejected).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["snapshot"]["culture"]["key"], "barbarian");
        assert_eq!(value["rejected"][0]["index"], 4);
        assert_eq!(value["rejected"][0]["command"]["op"], "roll_age");
        assert_eq!(value["rejected"][0]["rejection"]["reason"], "missing_context");
        assert_eq!(value["rejected"][0]["rejection"]["kind"], "age_bracket");
    }
}
