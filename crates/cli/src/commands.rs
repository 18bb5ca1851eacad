//! Subcommand handlers.

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sitebook_client::services::auth::Credentials;
use sitebook_client::services::{
    AttendanceService, AuthService, CrudService, LabourService, Resource, SiteService,
};
use sitebook_client::services::{
    Attendance, Customers, Expenses, Labour, Projects, Salaries, SiteMaterials, Subcontractors,
    Suppliers, Transactions,
};
use sitebook_client::ApiClient;
use sitebook_core::error::CoreError;
use sitebook_core::models::{CreateAttendance, Record};
use sitebook_core::password_gate::{PasswordGate, ProtectedAction};
use sitebook_core::roles::{Area, Role};
use sitebook_core::table::{self, SortDirection, SortSpec, TableQuery, Tabular};

use crate::cli::{AttendanceCommand, Command, Entity, ListArgs};
use crate::fields::form_from_fields;
use crate::render;

/// Password prompts allowed before an edit or delete is abandoned.
const MAX_PASSWORD_ATTEMPTS: usize = 3;

/// Run `$f::<Marker>(args..)` for the resource behind an [`Entity`].
macro_rules! for_entity {
    ($entity:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $entity {
            Entity::Labour => $f::<Labour>($($arg),*).await,
            Entity::Attendance => $f::<Attendance>($($arg),*).await,
            Entity::Salaries => $f::<Salaries>($($arg),*).await,
            Entity::Materials => $f::<SiteMaterials>($($arg),*).await,
            Entity::Suppliers => $f::<Suppliers>($($arg),*).await,
            Entity::Subcontractors => $f::<Subcontractors>($($arg),*).await,
            Entity::Customers => $f::<Customers>($($arg),*).await,
            Entity::Transactions => $f::<Transactions>($($arg),*).await,
            Entity::Expenses => $f::<Expenses>($($arg),*).await,
            Entity::Projects => $f::<Projects>($($arg),*).await,
        }
    };
}

/// Output settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}

pub async fn run(client: ApiClient, command: Command, out: Output) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => login(&client, email, password).await,
        Command::List(args) => for_entity!(args.entity, list(&client, &args, out)),
        Command::Show { entity, id } => for_entity!(entity, show(&client, &id, out)),
        Command::Create { entity, fields } => {
            ensure_can_create(&client, entity.area())?;
            for_entity!(entity, create(&client, &fields, out))
        }
        Command::Edit {
            entity,
            id,
            fields,
            password,
        } => for_entity!(entity, edit(&client, &id, &fields, password, out)),
        Command::Delete {
            entity,
            id,
            password,
        } => for_entity!(entity, delete(&client, &id, password)),
        Command::Attendance(cmd) => attendance(&client, cmd, out).await,
        Command::Salaries { labourer } => salaries(&client, labourer.as_deref(), out).await,
        Command::Site { project_id } => site(&client, &project_id, out).await,
        Command::Download { path, output } => download(&client, &path, output).await,
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn login(client: &ApiClient, email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    let auth = AuthService::new(client.clone());
    let user = auth.login(&Credentials { email, password }).await?;
    let token = client.session().token().unwrap_or_default();

    eprintln!(
        "Signed in as {} ({:?})",
        user.name.as_deref().unwrap_or(&user.id),
        user.role
    );
    println!("export SITEBOOK_TOKEN={token}");
    println!("export SITEBOOK_ROLE={}", user.role.as_str());
    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Refuse a create the session role may not make. The role comes from the
/// login response or from `SITEBOOK_ROLE`; an unknown role has no rights.
fn ensure_can_create(client: &ApiClient, area: Area) -> anyhow::Result<()> {
    let role = client.session().role();
    if !role.can_create(area) {
        bail!(
            "role '{}' may not add records here{}",
            role.as_str(),
            role_hint(role)
        );
    }
    Ok(())
}

fn ensure_can_modify(client: &ApiClient) -> anyhow::Result<()> {
    let role = client.session().role();
    if !role.can_modify() {
        bail!(
            "role '{}' may not edit or delete records{}",
            role.as_str(),
            role_hint(role)
        );
    }
    Ok(())
}

fn role_hint(role: Role) -> &'static str {
    match role {
        Role::Unknown => " (sign in again or set SITEBOOK_ROLE)",
        _ => "",
    }
}

/// Confirm an edit or delete through the password gate.
///
/// A password given on the command line gets one attempt; a prompted one
/// gets [`MAX_PASSWORD_ATTEMPTS`].
async fn confirm_action(
    client: &ApiClient,
    action: ProtectedAction,
    password: Option<String>,
) -> anyhow::Result<ProtectedAction> {
    ensure_can_modify(client)?;

    let auth = AuthService::new(client.clone());
    let mut gate = PasswordGate::new();
    eprintln!("{}", action.describe());
    gate.request(action);

    if let Some(password) = password {
        return Ok(gate.confirm(&password, &auth).await?);
    }
    for _ in 0..MAX_PASSWORD_ATTEMPTS {
        let password = prompt_password()?;
        match gate.confirm(&password, &auth).await {
            Ok(action) => return Ok(action),
            Err(CoreError::Unauthorized(_) | CoreError::Validation(_)) => {
                eprintln!("{}", gate.error().unwrap_or("Password rejected"));
            }
            Err(e) => return Err(e.into()),
        }
    }
    gate.cancel();
    bail!("too many incorrect passwords")
}

// ---------------------------------------------------------------------------
// Generic record commands
// ---------------------------------------------------------------------------

async fn list<R>(client: &ApiClient, args: &ListArgs, out: Output) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Tabular + Serialize,
{
    let records = CrudService::<R>::new(client.clone()).list().await?;
    let query = TableQuery {
        search: args.search.clone(),
        sort: args.sort.as_ref().map(|column| SortSpec {
            column: column.clone(),
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        }),
        page: args.page,
        page_size: args.page_size,
    };
    let page = table::apply(&records, &query)?;
    out.print(&page.items, || render::render_page(&page))
}

async fn show<R>(client: &ApiClient, id: &str, out: Output) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Tabular + Serialize,
{
    let record = CrudService::<R>::new(client.clone()).get(id).await?;
    out.print(&record, || render::render_rows(std::slice::from_ref(&record)))
}

async fn create<R>(client: &ApiClient, fields: &[String], out: Output) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Tabular + Serialize,
    R::Create: DeserializeOwned,
{
    let form: R::Create = form_from_fields(fields)?;
    let record = CrudService::<R>::new(client.clone()).create(&form).await?;
    eprintln!("Created {} {}", R::Record::ENTITY, record.id());
    out.print(&record, || render::render_rows(std::slice::from_ref(&record)))
}

async fn edit<R>(
    client: &ApiClient,
    id: &str,
    fields: &[String],
    password: Option<String>,
    out: Output,
) -> anyhow::Result<()>
where
    R: Resource,
    R::Record: Tabular + Serialize,
    R::Update: DeserializeOwned,
{
    let patch: R::Update = form_from_fields(fields)?;
    let action = ProtectedAction::Edit {
        entity: R::Record::ENTITY,
        id: id.to_string(),
    };
    let action = confirm_action(client, action, password).await?;

    let record = CrudService::<R>::new(client.clone())
        .update(action.id(), &patch)
        .await?;
    eprintln!("Updated {} {}", R::Record::ENTITY, record.id());
    out.print(&record, || render::render_rows(std::slice::from_ref(&record)))
}

async fn delete<R: Resource>(
    client: &ApiClient,
    id: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let action = ProtectedAction::Delete {
        entity: R::Record::ENTITY,
        id: id.to_string(),
    };
    let action = confirm_action(client, action, password).await?;

    CrudService::<R>::new(client.clone())
        .delete(action.id())
        .await?;
    eprintln!("Deleted {} {}", R::Record::ENTITY, action.id());
    Ok(())
}

// ---------------------------------------------------------------------------
// Attendance, salaries, sites, files
// ---------------------------------------------------------------------------

async fn attendance(
    client: &ApiClient,
    command: AttendanceCommand,
    out: Output,
) -> anyhow::Result<()> {
    let service = AttendanceService::new(client.clone());
    match command {
        AttendanceCommand::Grid { year, month } => {
            let labour = LabourService::new(client.clone());
            let grid = service.monthly_grid(&labour, year, month).await?;
            out.print(&grid, || render::render_grid(&grid))
        }
        AttendanceCommand::Sites => {
            let sites = service.site_percentages().await?;
            out.print(&sites, || render::render_site_percentages(&sites))
        }
        AttendanceCommand::Mark {
            date,
            status,
            project,
            labourers,
        } => {
            ensure_can_create(client, Area::Attendance)?;
            let entries: Vec<CreateAttendance> = labourers
                .into_iter()
                .map(|labour| CreateAttendance {
                    labour,
                    date,
                    status,
                    hours_worked: None,
                    overtime_hours: None,
                    project: project.clone(),
                    remarks: None,
                })
                .collect();
            let outcome = service.bulk_create(&entries).await?;
            eprintln!(
                "Marked {} labourer(s) {} on {}",
                outcome.saved,
                status.label(),
                date
            );
            Ok(())
        }
    }
}

async fn salaries(client: &ApiClient, labourer: Option<&str>, out: Output) -> anyhow::Result<()> {
    let labour = LabourService::new(client.clone());
    let records = match labourer {
        Some(id) => labour.salaries_for(id).await?,
        None => labour.all_salaries().await?,
    };
    out.print(&records, || render::render_rows(&records))
}

async fn site(client: &ApiClient, project_id: &str, out: Output) -> anyhow::Result<()> {
    let details = SiteService::new(client.clone())
        .site_details(project_id)
        .await?;
    out.print(&details.summary, || render::render_site(&details))
}

async fn download(
    client: &ApiClient,
    path: &str,
    output: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let file = client.download(path).await?;
    let target = output
        .or_else(|| {
            let name = std::path::Path::new(file.file_name.as_deref()?).file_name()?;
            Some(std::path::PathBuf::from(name))
        })
        .context("no file name in the response; pass --output")?;
    tokio::fs::write(&target, &file.bytes)
        .await
        .with_context(|| format!("failed to write {}", target.display()))?;
    eprintln!("Saved {} bytes to {}", file.bytes.len(), target.display());
    Ok(())
}
