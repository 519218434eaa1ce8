use crate::cli::commands::open_active_session;
use crate::cli::parser::DeviceAction;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::fs_utils::export_file_path;
use crate::export::model::{USER_HEADERS, users_to_table};
use crate::export::{ExportFormat, FileSink, TabularSink};
use crate::models::RawUser;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{CYAN, RESET, colorize_flag};
use crate::utils::table::Table;
use chrono::Local;
use std::path::{Path, PathBuf};

pub fn handle(action: &DeviceAction, cfg: &Config) -> AppResult<()> {
    let mut session = open_active_session(cfg)?;

    match action {
        DeviceAction::Status => {
            let device = cfg.active_device()?;
            let enabled = session.is_device_enabled()?;
            let users = session.fetch_users()?.len();
            let punches = session.fetch_attendance(None, None)?.len();

            println!("📟 Device {CYAN}{}{RESET} ({})", device.name, device.address());
            println!("   Session : {:?}", session.state());
            println!("   Enabled : {}", colorize_flag(enabled, "yes", "no (locked for transfer)"));
            println!("   Users   : {users}");
            println!("   Punches : {punches}");
        }
        DeviceAction::Users { export, format } => {
            let users = session.fetch_users()?;
            if users.is_empty() {
                warning("No users enrolled on the device.");
            } else {
                let mut table = Table::new(&["User ID", "Name"]);
                for u in &users {
                    table.add_row(vec![u.user_id.to_string(), u.name.clone()]);
                }
                print!("{}", table.render());
                info(format!("{} user(s)", users.len()));

                if *export {
                    let format = format.unwrap_or(cfg.file_format);
                    let path = export_users(&users, &cfg.export_dir(), format)?;
                    success(format!(
                        "Exported {} users to {}",
                        users.len(),
                        path.display()
                    ));
                }
            }
        }
    }

    session.close()
}

/// `users_<timestamp>.<ext>` with `[id, name]` rows.
fn export_users(users: &[RawUser], dir: &Path, format: ExportFormat) -> AppResult<PathBuf> {
    let path = export_file_path(dir, "users", format, Local::now().naive_local())?;
    FileSink::new(format).write(&users_to_table(users), &USER_HEADERS, &path)?;
    Ok(path)
}
