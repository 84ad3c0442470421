use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    ClientError, FormDraft, HttpPublicationApi, PublicationApi, PublicationBoard,
};
use shared::domain::{PublicationId, PublicationStatus};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "publications", about = "Open publication review requests")]
struct Args {
    /// Publication store base URL, including any path prefix.
    #[arg(long, env = "PUBLICATIONS_API_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortColumn {
    Date,
    Status,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the publication types offered by the store.
    Types,
    /// List publications, optionally filtered by type and sorted.
    List {
        /// Show only these types; repeat for several. Defaults to every type.
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long, value_enum)]
        sort: Option<SortColumn>,
        /// Flip the sort direction (date defaults to newest first, status to pending first).
        #[arg(long, requires = "sort")]
        reverse: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one publication in full.
    Show { id: String },
    /// Move a publication to the next review status.
    Advance { id: String },
    /// Set a publication's review status.
    SetStatus { id: String, status: PublicationStatus },
    /// Submit a new publication for review.
    Create(CreateArgs),
}

#[derive(clap::Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    /// Publication type; defaults to the first type offered by the store.
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    authors: String,
    #[arg(long = "coauthor")]
    coauthors: Vec<String>,
    #[arg(long)]
    collective: bool,
    #[arg(long)]
    contact_name: String,
    #[arg(long)]
    contact_phone: String,
    #[arg(long)]
    contact_email: String,
    #[arg(long)]
    no_state_secret: bool,
    #[arg(long)]
    expert_number: String,
    /// Expert decision date, DD.MM.YYYY.
    #[arg(long)]
    expert_date: String,
    #[arg(long)]
    expert_start: String,
    #[arg(long)]
    expert_end: String,
}

impl CreateArgs {
    fn fill(self, draft: &mut FormDraft) {
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        draft.title = self.title;
        draft.authors = self.authors;
        for (index, coauthor) in self.coauthors.into_iter().enumerate() {
            draft.add_coauthor();
            draft.set_coauthor(index, coauthor);
        }
        draft.is_collective_authors = self.collective;
        draft.contact_name = self.contact_name;
        draft.contact_phone = self.contact_phone;
        draft.contact_email = self.contact_email;
        draft.no_state_secret = self.no_state_secret;
        draft.expert_number = self.expert_number;
        draft.expert_date = self.expert_date;
        draft.expert_start = self.expert_start;
        draft.expert_end = self.expert_end;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let board = PublicationBoard::new(HttpPublicationApi::new(&args.base_url)?);
    let outcome = board.load().await?;
    for record in &outcome.quarantined {
        warn!(id = ?record.id, reason = %record.reason, "skipped malformed publication");
    }

    match args.command {
        Command::Types => {
            for ty in board.catalog().await.types() {
                println!("{}\t{}", ty.id, ty.name);
            }
        }
        Command::List {
            types,
            sort,
            reverse,
            json,
        } => {
            narrow_types(&board, &types).await?;
            apply_sort(&board, sort, reverse).await;
            let view = board.view().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", render::header(board.sort().await));
                for publication in &view {
                    println!("{}", render::row(publication));
                }
            }
        }
        Command::Show { id } => {
            let id = PublicationId(id);
            let Some(publication) = board.open_publication(&id).await else {
                bail!("publication {id} not found");
            };
            println!("{}", render::details(&publication));
        }
        Command::Advance { id } => {
            let updated = board.advance_status(&PublicationId(id)).await?;
            println!("{}", render::row(&updated));
        }
        Command::SetStatus { id, status } => {
            let updated = board.update_status(&PublicationId(id), status).await?;
            println!("{}", render::row(&updated));
        }
        Command::Create(create) => {
            board.open_form().await;
            board.edit_draft(|draft| create.fill(draft)).await;
            match board.submit().await {
                Ok(created) => println!("{}", render::details(&created)),
                Err(ClientError::Validation { missing }) => {
                    for field in &missing {
                        eprintln!("missing required field: {field}");
                    }
                    bail!("publication was not submitted");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}

/// Leaves exactly `wanted` selected. The board starts with every type selected.
async fn narrow_types<A: PublicationApi>(
    board: &PublicationBoard<A>,
    wanted: &[String],
) -> Result<()> {
    if wanted.is_empty() {
        return Ok(());
    }
    let catalog = board.catalog().await;
    for name in wanted {
        catalog.resolve(name)?;
    }
    for name in board.selected_types().await {
        if !wanted.iter().any(|wanted| wanted == name.as_str()) {
            board.select_type(name.as_str()).await;
        }
    }
    Ok(())
}

async fn apply_sort<A: PublicationApi>(
    board: &PublicationBoard<A>,
    sort: Option<SortColumn>,
    reverse: bool,
) {
    let clicks = if reverse { 2 } else { 1 };
    for _ in 0..clicks {
        match sort {
            Some(SortColumn::Date) => {
                board.toggle_date_sort().await;
            }
            Some(SortColumn::Status) => {
                board.toggle_status_sort().await;
            }
            None => {}
        }
    }
}
