use chrono::Utc;

use super::AppContext;
use crate::error::AppError;
use crate::services::dashboard::prompt_for;
use crate::services::date_key::local_day;
use crate::services::DashboardPage;

fn page(ctx: &AppContext) -> DashboardPage {
    DashboardPage::new(ctx.session.clone(), ctx.store())
}

pub async fn show_profile(ctx: &AppContext) -> Result<(), AppError> {
    let info = page(ctx).load_employee()?.unwrap_or_default();
    let name = ctx.session.author_label();
    println!("{}", name);
    println!("  department       {}", or_dash(&info.department));
    println!("  jobTitle         {}", or_dash(&info.job_title));
    println!("  employmentType   {}", or_dash(&info.employment_type));
    println!("  dateJoined       {}", or_dash(&info.date_joined));
    println!("  status           {}", or_dash(&info.status));
    Ok(())
}

/// Apply `key=value` pairs on top of the stored profile and save it.
pub async fn save_profile(ctx: &AppContext, pairs: &[String]) -> Result<(), AppError> {
    let page = page(ctx);
    let mut info = page.load_employee()?.unwrap_or_default();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| AppError::Validation(format!("Expected key=value, got '{}'", pair)))?;
        info.apply(key.trim(), value).map_err(AppError::Validation)?;
    }
    page.save_employee(&info)?;
    println!("Profile saved.");
    Ok(())
}

pub async fn prompt(ctx: &AppContext) -> Result<(), AppError> {
    let today = local_day(Utc::now(), &ctx.timezone());
    println!("{}", prompt_for(today));
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
