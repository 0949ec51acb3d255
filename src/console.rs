// src/console.rs
//! Interactive numbered menu over the same pipeline as the REST API

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app_log;
use crate::core::text_extractor::{extract_text_from_file, find_cv_pdf};
use crate::core::{open_profile_store, AppConfig, CompletionClient, OpenAiClient, ProfileStore};
use crate::error::CoachError;
use crate::services::{CvAnalysisService, JobSearchService};
use crate::types::{Profile, SearchMode};

const SEPARATOR: &str = "==================================================";

/// Collaborators for one console session.
pub struct ConsoleSession {
    pub analysis: CvAnalysisService,
    pub jobs: JobSearchService,
    pub store: Arc<dyn ProfileStore>,
    pub cv_folder: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Analyze,
    Search(SearchMode),
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Analyze),
            "2" => Some(Self::Search(SearchMode::Matching)),
            "3" => Some(Self::Search(SearchMode::Alternative)),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

impl ConsoleSession {
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&config.openai)?);
        let store = open_profile_store(config).await?;

        Ok(Self {
            analysis: CvAnalysisService::new(client.clone()),
            jobs: JobSearchService::new(client),
            store,
            cv_folder: config.cv_folder.clone(),
        })
    }

    /// Loop until the user picks exit or input ends.
    ///
    /// The analysed profile is carried as a local value from option 1 to
    /// options 2 and 3; without one the store's latest profile is used.
    pub async fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        let mut current: Option<Profile> = None;

        loop {
            print_menu(output)?;

            let mut line = String::new();
            let read = input.read_line(&mut line).context("Failed to read menu input")?;
            if read == 0 {
                app_log!(info, "Console input closed");
                break;
            }

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Analyze) => {
                    if let Some(profile) = self.analyze_cv(output).await? {
                        current = Some(profile);
                    }
                }
                Some(MenuChoice::Search(mode)) => {
                    self.search_jobs(current.as_ref(), mode, output).await?;
                }
                Some(MenuChoice::Exit) => {
                    writeln!(output, "Goodbye!")?;
                    break;
                }
                None => {
                    writeln!(output, "Invalid option. Please choose 1-4.")?;
                }
            }
        }

        Ok(())
    }

    async fn analyze_cv<W: Write>(&self, output: &mut W) -> Result<Option<Profile>> {
        writeln!(output, "\nAnalyzing CV from folder: {}", self.cv_folder.display())?;

        match self.analyze_and_store().await {
            Ok(profile) => {
                writeln!(output, "\nCV analysis complete:\n{}", SEPARATOR)?;
                writeln!(output, "{}", profile)?;
                writeln!(output, "{}", SEPARATOR)?;
                writeln!(output, "Profile saved to {}", self.store.location())?;
                Ok(Some(profile))
            }
            Err(e) => {
                report_error(output, "CV analysis failed", &e)?;
                Ok(None)
            }
        }
    }

    async fn analyze_and_store(&self) -> crate::Result<Profile> {
        let pdf = find_cv_pdf(&self.cv_folder).await?;
        app_log!(info, "Analyzing CV file: {}", pdf.display());

        let cv_text = extract_text_from_file(&pdf).await?;
        let profile = self.analysis.analyze(&cv_text).await?;
        self.store.save(&profile).await?;
        Ok(profile)
    }

    async fn search_jobs<W: Write>(
        &self,
        current: Option<&Profile>,
        mode: SearchMode,
        output: &mut W,
    ) -> Result<()> {
        let profile = match current {
            Some(profile) => profile.clone(),
            None => match self.store.latest().await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    writeln!(output, "\nNo CV data found. Please analyze your CV first (Option 1).")?;
                    return Ok(());
                }
                Err(e) => {
                    report_error(output, "Could not load CV data", &e)?;
                    return Ok(());
                }
            },
        };

        writeln!(output, "\nSearching for {} jobs...", mode.label())?;

        match self.jobs.search(&profile, mode).await {
            Ok(offers) if offers.is_empty() => {
                writeln!(output, "No job suggestions were returned.")?;
            }
            Ok(offers) => {
                writeln!(output, "\n{} job suggestions:\n{}", capitalize(mode.label()), SEPARATOR)?;
                for (index, offer) in offers.iter().enumerate() {
                    writeln!(output, "\n{}.", index + 1)?;
                    writeln!(output, "{}", offer)?;
                }
                writeln!(output, "{}", SEPARATOR)?;
            }
            Err(e) => report_error(output, "Job search failed", &e)?,
        }

        Ok(())
    }
}

/// Run the menu on the terminal until the user exits.
pub async fn run_console(config: AppConfig) -> Result<()> {
    let session = ConsoleSession::from_config(&config).await?;
    app_log!(info, "Console session started, CV folder: {}", session.cv_folder.display());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session.run(&mut stdin.lock(), &mut stdout.lock()).await
}

fn print_menu<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "\n{}", SEPARATOR)?;
    writeln!(output, "CV Career Coach")?;
    writeln!(output, "{}", SEPARATOR)?;
    writeln!(output, "1. Analyze CV")?;
    writeln!(output, "2. Find matching jobs")?;
    writeln!(output, "3. Find alternative careers")?;
    writeln!(output, "4. Exit")?;
    write!(output, "Choose an option (1-4): ")?;
    output.flush()?;
    Ok(())
}

fn report_error<W: Write>(output: &mut W, context: &str, error: &CoachError) -> Result<()> {
    app_log!(error, "{}: {}", context, error);
    writeln!(output, "\n{}: {}", context, error)?;
    for hint in error.suggestions() {
        writeln!(output, "  - {}", hint)?;
    }
    Ok(())
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
