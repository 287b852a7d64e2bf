use super::AppContext;
use crate::error::AppError;
use crate::models::UserSettings;
use crate::services::{SettingsPage, SettingsState};

fn page(ctx: &AppContext) -> SettingsPage {
    SettingsPage::new(ctx.session.clone(), ctx.store(), ctx.cache.clone())
}

/// Reconcile with the stored document, falling back to the cached copy.
fn reconciled(ctx: &AppContext) -> SettingsPage {
    let mut page = page(ctx);
    if let Err(e) = page.reconcile() {
        log::warn!("Settings reconcile failed: {}", e);
        eprintln!("{} Showing locally cached settings.", e.banner("settings"));
    }
    page
}

pub async fn show(ctx: &AppContext) -> Result<(), AppError> {
    let page = reconciled(ctx);
    print_settings(page.state());
    Ok(())
}

/// Edits stack on the cached copy until `save`; reconciling here would let
/// the stored document wipe earlier unsaved edits.
pub async fn set(ctx: &AppContext, key: &str, value: &str) -> Result<(), AppError> {
    let mut page = page(ctx);
    let mut next = page.settings().clone();
    next.apply(key, value).map_err(AppError::Validation)?;
    page.update(|s| *s = next)?;
    println!("Updated {} locally. Run `motiverse settings save` to sync.", key);
    Ok(())
}

pub async fn reset(ctx: &AppContext) -> Result<(), AppError> {
    let mut page = page(ctx);
    page.reset()?;
    println!("Settings reset to defaults locally.");
    Ok(())
}

pub async fn save(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    page.save()?;
    println!("Settings saved.");
    Ok(())
}

fn print_settings(state: &SettingsState) {
    let source = if state.is_reconciled() { "synced" } else { "cached" };
    let UserSettings {
        theme_mode,
        accent,
        reduce_motion,
        compact_mode,
        show_motivation_on_dashboard,
        show_employee_strip,
    } = state.settings();
    println!("Settings ({})", source);
    println!("  themeMode                  {}", theme_mode);
    println!("  accent                     {}", accent);
    println!("  reduceMotion               {}", reduce_motion);
    println!("  compactMode                {}", compact_mode);
    println!("  showMotivationOnDashboard  {}", show_motivation_on_dashboard);
    println!("  showEmployeeStrip          {}", show_employee_strip);
}
