//! Taskboard CLI - command line interface for the Taskboard API.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskboard_client::{BoardSession, HttpClient};
use taskboard_core::wire::{CreateTaskRequest, CreateWorkspaceRequest, TaskQuery};
use taskboard_core::{
    ActingIdentity, MemberId, ProjectId, Task, TaskId, TaskStatus, WorkspaceId,
};

/// Taskboard CLI - workspace and board management tool
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "CLI for the Taskboard API", long_about = None)]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "http://[::1]:8080")]
    addr: String,

    /// User id to act as
    #[arg(short, long)]
    user: String,

    /// Display name sent with requests
    #[arg(long)]
    name: Option<String>,

    /// Email sent with requests
    #[arg(long)]
    email: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health
    Health,

    /// List workspaces you belong to
    Workspaces,

    /// Create a workspace
    #[command(name = "create-workspace")]
    CreateWorkspace {
        /// Workspace name
        name: String,
    },

    /// List members of a workspace
    Members {
        /// Workspace ID
        workspace: String,
    },

    /// Create a task
    #[command(name = "create-task")]
    CreateTask {
        #[arg(short, long)]
        workspace: String,

        #[arg(short, long)]
        project: String,

        /// Task name
        name: String,

        /// Board column
        #[arg(short, long, default_value = "TODO")]
        status: String,

        /// Member ID to assign
        #[arg(long)]
        assignee: Option<String>,

        /// Explicit position; omit to append to the column
        #[arg(long)]
        position: Option<i64>,
    },

    /// List tasks
    Tasks {
        #[arg(short, long)]
        workspace: String,

        #[arg(short, long)]
        project: Option<String>,

        /// Only this column
        #[arg(short, long)]
        status: Option<String>,

        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
    },

    /// Show a project board column by column
    Board {
        #[arg(short, long)]
        project: String,
    },

    /// Move a task to a column and index
    #[command(name = "move-task")]
    MoveTask {
        /// Task ID
        id: String,

        #[arg(short, long)]
        project: String,

        /// Destination column
        #[arg(short, long)]
        status: String,

        /// Destination index within the column
        #[arg(short, long, default_value = "0")]
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taskboard_client=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut identity = ActingIdentity::new(cli.user.as_str());
    identity.name = cli.name;
    identity.email = cli.email;
    let client = HttpClient::new(&cli.addr, identity);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            println!("{}", if healthy { "ok" } else { "unhealthy" });
        }
        Commands::Workspaces => {
            let workspaces = client.list_workspaces().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&workspaces)?);
                return Ok(());
            }
            println!("Workspaces ({}):", workspaces.len());
            println!("{:<36}  {:<8}  {}", "ID", "INVITE", "NAME");
            println!("{}", "-".repeat(70));
            for ws in workspaces {
                println!("{:<36}  {:<8}  {}", ws.id.as_str(), ws.invite_code, ws.name);
            }
        }
        Commands::CreateWorkspace { name } => {
            let ws = client
                .create_workspace(&CreateWorkspaceRequest {
                    name,
                    image_url: None,
                })
                .await?;
            println!("Workspace created:");
            println!("  ID:          {}", ws.id);
            println!("  Name:        {}", ws.name);
            println!("  Invite code: {}", ws.invite_code);
        }
        Commands::Members { workspace } => {
            let members = client.list_members(&WorkspaceId::new(workspace)).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&members)?);
                return Ok(());
            }
            println!("Members ({}):", members.len());
            println!("{:<36}  {:<6}  {}", "ID", "ROLE", "NAME");
            println!("{}", "-".repeat(70));
            for member in members {
                let role = if member.role.is_admin() { "ADMIN" } else { "MEMBER" };
                println!("{:<36}  {:<6}  {}", member.id.as_str(), role, member.name);
            }
        }
        Commands::CreateTask {
            workspace,
            project,
            name,
            status,
            assignee,
            position,
        } => {
            let task = client
                .create_task(&CreateTaskRequest {
                    workspace_id: WorkspaceId::new(workspace),
                    project_id: ProjectId::new(project),
                    name,
                    status,
                    assignee_id: assignee.map(MemberId::new),
                    description: None,
                    due_date: None,
                    position: position.map(|p| p as f64),
                })
                .await?;
            println!("Task created:");
            print_task(&task);
        }
        Commands::Tasks {
            workspace,
            project,
            status,
            search,
        } => {
            let query = TaskQuery {
                workspace_id: WorkspaceId::new(workspace),
                project_id: project.map(ProjectId::new),
                status,
                search,
                ..TaskQuery::default()
            };
            let tasks = client.list_tasks(&query).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }
            println!("Tasks ({}):", tasks.len());
            println!("{:<36}  {:<11}  {:>8}  {:<10}  {}", "ID", "STATUS", "POS", "DUE", "NAME");
            println!("{}", "-".repeat(90));
            for task in tasks {
                println!(
                    "{:<36}  {:<11}  {:>8}  {:<10}  {}",
                    task.id.as_str(),
                    task.status.as_str(),
                    task.position,
                    format_due(&task),
                    task.name
                );
            }
        }
        Commands::Board { project } => {
            let session = BoardSession::load(client, ProjectId::new(project)).await?;
            for status in TaskStatus::ALL {
                let column = session.board().column(status);
                println!("{} ({})", status, column.len());
                for task in column {
                    println!("  {:>8}  {}  [{}]", task.position, task.name, task.id);
                }
            }
        }
        Commands::MoveTask {
            id,
            project,
            status,
            index,
        } => {
            let column: TaskStatus = status.parse()?;
            let mut session = BoardSession::load(client, ProjectId::new(project)).await?;
            let plan = session.move_task(&TaskId::new(id), column, index).await?;
            println!("Saved {} update(s):", plan.len());
            for update in plan {
                println!("  {}  {}  {}", update.task_id, update.status, update.position);
            }
        }
    }

    Ok(())
}

fn print_task(task: &Task) {
    println!("  ID:       {}", task.id);
    println!("  Name:     {}", task.name);
    println!("  Status:   {}", task.status);
    println!("  Position: {}", task.position);
    println!("  Due:      {}", format_due(task));
    println!("  Created:  {}", task.created_at.format("%Y-%m-%d %H:%M:%S"));
}

fn format_due(task: &Task) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
