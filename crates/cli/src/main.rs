//! `presensi` -- command-line client for the presensi attendance service.
//!
//! Logs in against the backend, submits check-ins (location plus a photo)
//! and check-outs, and prints the daily attendance report.
//!
//! # Environment variables
//!
//! | Variable                  | Default                  | Description                          |
//! |---------------------------|--------------------------|--------------------------------------|
//! | `PRESENSI_API_URL`        | `http://localhost:3001`  | Backend base URL                     |
//! | `PRESENSI_SESSION_FILE`   | `.presensi-session.json` | Where the login session is kept      |
//! | `PRESENSI_GEO_TIMEOUT_MS` | `5000`                   | Position request timeout             |
//! | `PRESENSI_CAPTURE_WIDTH`  | `640`                    | Photo width sent on check-in         |
//! | `PRESENSI_CAPTURE_HEIGHT` | `480`                    | Photo height sent on check-in        |
//! | `PRESENSI_LATITUDE`       | --                       | Position used when `--lat` is absent |
//! | `PRESENSI_LONGITUDE`      | --                       | Position used when `--lon` is absent |
//! | `RUST_LOG`                | `presensi_cli=info`      | Log filter                           |

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use presensi_client::camera::{CameraDevice, FileCamera, UnavailableCamera};
use presensi_client::config::ClientConfig;
use presensi_client::context::ClientContext;
use presensi_client::geolocation::{
    FixedLocationProvider, LocationProvider, UnavailableLocationProvider,
};
use presensi_client::session::decode_claims;
use presensi_client::submitter::{AttendanceSubmitter, SubmissionOutcome};
use presensi_core::display::{format_date, format_time};
use presensi_core::geo::Coordinate;
use presensi_core::messages::{CAMERA_UNAVAILABLE, SESSION_REQUIRED};
use presensi_core::report::ReportFilter;
use presensi_core::roles::{can_view_reports, DEFAULT_ROLE};
use presensi_core::user::{RegisterRequest, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "presensi")]
#[command(about = "Attendance client: check in with location and photo, browse reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        nama: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// mahasiswa or admin
        #[arg(long, default_value = DEFAULT_ROLE)]
        role: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in profile and available menus
    Dashboard,
    /// Record a check-in with the current position and a photo
    CheckIn {
        #[command(flatten)]
        location: LocationArgs,
        /// Image file used as the camera frame
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Record a check-out with the current position
    CheckOut {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Print the attendance report
    Report {
        /// Name search
        #[arg(long)]
        nama: Option<String>,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presensi_cli=info,presensi_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Configuration loaded",
    );

    let ctx = ClientContext::from_config(config)
        .await
        .context("Could not read the stored session")?;

    match cli.command {
        Commands::Login { email, password } => login(&ctx, &email, &password).await,
        Commands::Register {
            nama,
            email,
            password,
            role,
        } => {
            let request = RegisterRequest::new(nama, email, password).with_role(role);
            let message = ctx
                .auth()
                .register_message(&request)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("{message}");
            Ok(())
        }
        Commands::Logout => {
            ctx.auth().logout().await?;
            println!("Sesi telah diakhiri.");
            Ok(())
        }
        Commands::Dashboard => dashboard(&ctx).await,
        Commands::CheckIn { location, photo } => check_in(&ctx, &location, photo).await,
        Commands::CheckOut { location } => check_out(&ctx, &location).await,
        Commands::Report {
            nama,
            start_date,
            end_date,
        } => report(&ctx, nama, start_date, end_date).await,
    }
}

async fn login(ctx: &ClientContext, email: &str, password: &str) -> anyhow::Result<()> {
    let session = ctx
        .auth()
        .login_message(email, password)
        .await
        .map_err(|e| anyhow!(e))?;

    tracing::info!(email = %session.user.email, role = %session.user.role, "Logged in");
    println!("Selamat datang, {}!", session.user.nama);
    Ok(())
}

/// The active session, or an error telling the user to log in again.
async fn require_session(ctx: &ClientContext) -> anyhow::Result<Session> {
    ctx.sessions
        .current()
        .await
        .ok_or_else(|| anyhow!(SESSION_REQUIRED))
}

async fn dashboard(ctx: &ClientContext) -> anyhow::Result<()> {
    let session = require_session(ctx).await?;
    let user = &session.user;

    println!("Nama  : {}", user.nama);
    println!("Email : {}", user.email);
    println!("Role  : {}", user.role);

    // Expiry is informational; an unreadable token is left to the server.
    match decode_claims(&session.token) {
        Ok(claims) => {
            if let Some(exp) = claims.exp.and_then(|s| DateTime::from_timestamp(s, 0)) {
                println!(
                    "Sesi  : berlaku hingga {} {}",
                    format_date(Some(exp), &Local),
                    format_time(Some(exp), &Local)
                );
            }
        }
        Err(e) => tracing::debug!(error = %e, "Token claims not readable"),
    }

    println!();
    println!("Menu:");
    println!("  presensi check-in   Check-in dengan lokasi dan foto");
    println!("  presensi check-out  Check-out dengan lokasi");
    if can_view_reports(&user.role) {
        println!("  presensi report     Laporan presensi harian");
    }
    Ok(())
}

fn location_provider(
    args: &LocationArgs,
    configured: Option<Coordinate>,
) -> anyhow::Result<Arc<dyn LocationProvider>> {
    let coordinate = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
        _ => configured,
    };

    Ok(match coordinate {
        Some(c) => Arc::new(FixedLocationProvider::new(c)),
        None => Arc::new(UnavailableLocationProvider),
    })
}

/// Initialize the workflow and fail early if no position could be had.
async fn ready_workflow(
    ctx: &ClientContext,
    location: &LocationArgs,
    camera: Arc<dyn CameraDevice>,
) -> anyhow::Result<AttendanceSubmitter> {
    let provider = location_provider(location, ctx.config.fixed_location)?;
    let submitter = ctx.submitter(provider, camera);

    let snapshot = submitter.initialize().await?;
    if let Some(error) = snapshot.location_error {
        bail!(error);
    }
    if let Some(c) = snapshot.coordinate {
        println!("Lokasi: {:.6}, {:.6}", c.latitude(), c.longitude());
    }
    Ok(submitter)
}

fn print_outcome(outcome: SubmissionOutcome) -> anyhow::Result<()> {
    match outcome {
        SubmissionOutcome::Succeeded(message) => {
            println!("{message}");
            Ok(())
        }
        SubmissionOutcome::Failed(message) => bail!(message),
    }
}

async fn check_in(
    ctx: &ClientContext,
    location: &LocationArgs,
    photo: Option<PathBuf>,
) -> anyhow::Result<()> {
    require_session(ctx).await?;

    let camera: Arc<dyn CameraDevice> = match photo {
        Some(path) => Arc::new(FileCamera::new(path)),
        None => Arc::new(UnavailableCamera),
    };
    let submitter = ready_workflow(ctx, location, camera).await?;

    submitter.capture_photo().await.context(CAMERA_UNAVAILABLE)?;
    print_outcome(submitter.check_in().await?)
}

async fn check_out(ctx: &ClientContext, location: &LocationArgs) -> anyhow::Result<()> {
    require_session(ctx).await?;

    let submitter = ready_workflow(ctx, location, Arc::new(UnavailableCamera)).await?;
    print_outcome(submitter.check_out().await?)
}

async fn report(
    ctx: &ClientContext,
    nama: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
) -> anyhow::Result<()> {
    let session = require_session(ctx).await?;
    if !can_view_reports(&session.user.role) {
        tracing::warn!(role = %session.user.role, "Report requested by a non-admin role");
    }

    let mut filter = ReportFilter::new();
    if let Some(nama) = nama {
        filter = filter.with_nama(nama);
    }
    if let Some(date) = start_date {
        filter = filter.with_start_date(date);
    }
    if let Some(date) = end_date {
        filter = filter.with_end_date(date);
    }

    let mut view = ctx.report_view();
    let table = render::report_table(view.apply_filter(filter).await?, &Local);

    print!("{table}");
    println!();
    print!("{}", render::summary_lines(&view.summary()));
    Ok(())
}
