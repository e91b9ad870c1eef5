use crate::infra::{parse_list, InMemoryRecruitStore};
use clap::Args;
use recruit_board::ats::CandidateCsvImporter;
use recruit_board::board::{BoardService, MemoryScopeStore, MoveOutcome, ViewScope};
use recruit_board::error::AppError;
use recruit_board::pipeline::{
    filter_candidates, group_by_stage, BoardView, CandidateFilter, JobId, LifecycleScope,
    StageCatalog, StageId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct BoardReportArgs {
    /// Candidate CSV export to group
    #[arg(long)]
    pub(crate) candidates_csv: PathBuf,
    /// Case-insensitive name search
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Comma separated ATS statuses to keep
    #[arg(long)]
    pub(crate) statuses: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Company shown when the demo switches to the vendor portal
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Stage the first screening candidate is dragged to
    #[arg(long, default_value = "Interview")]
    pub(crate) move_to: String,
    /// List candidate names under each column
    #[arg(long)]
    pub(crate) list_candidates: bool,
}

pub(crate) fn run_stages() -> Result<(), AppError> {
    let catalog = StageCatalog::shared();

    println!("Pipeline stages");
    for stage in catalog.stages() {
        println!(
            "- {:<12} writes {:?}, groups: {}",
            stage.label,
            stage.canonical_status(),
            stage.statuses.join(", ")
        );
    }

    let overlaps = catalog.overlaps();
    if !overlaps.is_empty() {
        println!("\nShared statuses");
        for overlap in overlaps {
            println!(
                "- {:?} is listed by {} and {}; {} wins",
                overlap.status, overlap.claimed_by, overlap.shadowed, overlap.claimed_by
            );
        }
    }

    Ok(())
}

pub(crate) fn run_board_report(args: BoardReportArgs) -> Result<(), AppError> {
    let BoardReportArgs {
        candidates_csv,
        query,
        statuses,
    } = args;

    let candidates = CandidateCsvImporter::from_path(&candidates_csv)?;

    let mut filter = CandidateFilter::default();
    if let Some(query) = query {
        filter = filter.with_query(query);
    }
    if let Some(raw) = statuses.as_deref() {
        filter = filter.with_statuses(parse_list(raw));
    }
    let visible = filter_candidates(&candidates, &filter);

    println!(
        "Board for {} ({} of {} candidates)",
        candidates_csv.display(),
        visible.len(),
        candidates.len()
    );
    render_board(&group_by_stage(&visible), true);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        move_to,
        list_candidates,
    } = args;

    let store = Arc::new(InMemoryRecruitStore::demo()?);
    let scopes = Arc::new(MemoryScopeStore::default());
    let service = BoardService::new(store, scopes);

    println!("Recruiting board demo");

    let active = service.jobs(LifecycleScope::Active)?;
    println!("\nAdmin portal: {} active openings", active.len());
    for job in &active {
        println!(
            "- [{}] {} ({})",
            job.id,
            job.title,
            job.client_name.as_deref().unwrap_or("no client")
        );
    }
    let archived = service.jobs(LifecycleScope::Archived)?;
    println!("Archived openings: {}", archived.len());

    let companies = service.companies()?;
    let company = company.or_else(|| companies.first().cloned());
    if let Some(company) = company {
        service.set_scope(ViewScope::vendor(company.clone()))?;
        let scoped = service.jobs(LifecycleScope::Active)?;
        println!(
            "\nVendor portal for {company}: {} of {} active openings",
            scoped.len(),
            active.len()
        );
    }

    let Some(job) = active.first() else {
        println!("\nNo active openings to show a board for.");
        return Ok(());
    };
    let job_id: &JobId = &job.id;
    let filter = CandidateFilter::default();

    println!("\nBoard for {}", job.title);
    let board = service.board(job_id, &filter)?;
    render_board(&board, list_candidates);

    let Some(candidate) = board.candidates_in(StageId::Screening).first() else {
        println!("\nNobody is waiting in screening.");
        return Ok(());
    };

    println!("\nMoving {} to {move_to}", candidate.full_name());
    match service.move_candidate(job_id, &candidate.id, &move_to, &filter)? {
        MoveOutcome::Applied { transition, board } => {
            println!(
                "Status {:?} -> {:?} ({} -> {})",
                transition.previous_status,
                transition.new_status,
                transition.from_stage,
                transition.to_stage
            );
            render_board(&board, list_candidates);
            let stored = service.candidate(job_id, &candidate.id)?;
            println!("ATS now reports status {:?}", stored.candidate.status);
        }
        MoveOutcome::Superseded { transition } => {
            println!(
                "Move to {} was superseded before it was written",
                transition.to_stage
            );
        }
    }

    Ok(())
}

fn render_board(board: &BoardView, list_candidates: bool) {
    for column in &board.columns {
        println!("- {:<12} {:>3}", column.label, column.count);
        if list_candidates {
            for candidate in &column.candidates {
                println!("    {} [{}]", candidate.full_name(), candidate.status);
            }
        }
    }
    println!("  total        {:>3}", board.total());
}
