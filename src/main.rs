use clap::{Parser, Subcommand};
use mediatek_catalog::config;
use mediatek_catalog::item::convert::parse_date;
use mediatek_catalog::{CatalogRepository, PeriodicalCopy, RepoError};
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "mediatek", about = "MediaTek 카탈로그 API 클라이언트")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 장르 목록
    Genres,
    /// 서가 목록
    Shelves,
    /// 이용 대상 목록
    Audiences,
    /// 도서 목록
    Books,
    /// DVD 목록
    Dvds,
    /// 잡지 목록
    Periodicals,
    /// 문서 조회
    Document { id: String },
    /// 잡지의 호 목록
    Copies { periodical_id: String },
    /// 잡지의 호 등록
    AddCopy {
        periodical_id: String,
        number: i32,
        /// 입고일 (YYYY-MM-DD)
        #[arg(value_parser = parse_arrival_date)]
        arrival_date: chrono::NaiveDate,
        #[arg(long)]
        status: bool,
    },
    /// 문서 삭제
    DeleteDocument { id: String },
}

fn parse_arrival_date(s: &str) -> Result<chrono::NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let app_config = match config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cannot loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match app_config.logger() {
        Some(logger) => match config::log::set_global_logging_config(logger) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            if let Err(e) = config::log::set_stdout_logging_config(tracing::Level::INFO) {
                eprintln!("{}", e);
            }
            None
        }
    };

    let repository = match CatalogRepository::connect(app_config.api()) {
        Ok(repository) => repository,
        Err(e) => {
            error!(error = %e, "cannot create the catalogue API client");
            return ExitCode::from(u8::try_from(app_config.api().exit_code()).unwrap_or(1));
        }
    };

    match run(&repository, cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(repository: &CatalogRepository, command: Command) -> Result<bool, RepoError> {
    match command {
        Command::Genres => print_categories(repository.genres()?),
        Command::Shelves => print_categories(repository.shelves()?),
        Command::Audiences => print_categories(repository.audiences()?),
        Command::Books => {
            for book in repository.books()? {
                println!("{}\t{}\t{}\t{}\t{}", book.id, book.info.title, book.isbn, book.author, book.collection);
            }
        }
        Command::Dvds => {
            for dvd in repository.dvds()? {
                println!("{}\t{}\t{}\t{}", dvd.id, dvd.info.title, dvd.director, dvd.duration);
            }
        }
        Command::Periodicals => {
            for periodical in repository.periodicals()? {
                println!("{}\t{}\t{}\t{}", periodical.id, periodical.info.title, periodical.periodicity, periodical.availability_delay);
            }
        }
        Command::Document { id } => {
            for document in repository.documents(&id)? {
                println!("{}\t{}\t{}\t{}\t{}", document.id, document.info.title, document.info.genre_id, document.info.audience_id, document.info.shelf_id);
            }
        }
        Command::Copies { periodical_id } => {
            for copy in repository.copies_of(&periodical_id)? {
                println!("{}\t{}\t{}\t{}", copy.id, copy.number, copy.arrival_date, copy.status);
            }
        }
        Command::AddCopy { periodical_id, number, arrival_date, status } => {
            let copy = PeriodicalCopy::new(periodical_id, number, arrival_date, status);
            return repository.create_copy(&copy);
        }
        Command::DeleteDocument { id } => return repository.delete_document(&id),
    }
    Ok(true)
}

fn print_categories(categories: Vec<mediatek_catalog::Category>) {
    for category in categories {
        println!("{}\t{}", category.id(), category.label());
    }
}
