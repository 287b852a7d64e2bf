use super::{find_by_prefix, first_snapshot, format_ts, short_id, AppContext};
use crate::error::AppError;
use crate::models::{Completable, Goal};
use crate::services::{GoalDraft, GoalsPage};

fn page(ctx: &AppContext) -> GoalsPage {
    GoalsPage::new(ctx.session.clone(), ctx.store(), ctx.timezone())
}

pub async fn list(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    let goals = first_snapshot(|c| page.bind(c)).await?;
    if goals.is_empty() {
        println!("No goals yet.");
    }
    for goal in &goals {
        let mark = if goal.is_completed() { "x" } else { " " };
        println!(
            "[{}] {}  {}  ({})",
            mark,
            short_id(&goal.id),
            goal.text,
            format_ts(goal.created_at, &ctx.timezone())
        );
    }
    print_summary(&page, &goals);
    Ok(())
}

pub async fn add(ctx: &AppContext, text: &str) -> Result<(), AppError> {
    let page = page(ctx);
    let mut draft = GoalDraft::new(text);
    match page.add_goal(&mut draft)? {
        Some(id) => println!("Added goal {}", short_id(&id)),
        None => println!("Nothing to add."),
    }
    Ok(())
}

pub async fn toggle(ctx: &AppContext, id: &str) -> Result<(), AppError> {
    let page = page(ctx);
    let goals = first_snapshot(|c| page.bind(c)).await?;
    let goal = find_by_prefix(&goals, id, |g| g.id.as_str(), "goal")?;
    page.toggle_complete(goal)?;
    let state = if goal.completed { "open" } else { "done" };
    println!("Goal {} marked {}", short_id(&goal.id), state);
    Ok(())
}

pub async fn streak(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    let goals = first_snapshot(|c| page.bind(c)).await?;
    print_summary(&page, &goals);
    Ok(())
}

fn print_summary(page: &GoalsPage, goals: &[Goal]) {
    let summary = page.summary(goals);
    println!(
        "Streak: {} day(s) | open: {} | completed today: {}",
        summary.streak, summary.open_goals, summary.completed_today
    );
}
