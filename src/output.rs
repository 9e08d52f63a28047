use std::str::FromStr;

use colored::Colorize;
use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    analyzer::{AnalysisResult, Complexity, QueryFeatures},
    error::{AppResult, output_error}
};

/// Width of the query preview in text headers
const PREVIEW_WIDTH: usize = 80;

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format '{}'", other))
        }
    }
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Extra per-query detail shown in verbose mode
#[derive(Debug, Clone, Serialize)]
pub struct QueryDetails {
    #[serde(flatten)]
    pub features:          QueryFeatures,
    /// Relations referenced anywhere in the statement, subqueries included
    pub referenced_tables: IndexSet<String>
}

/// Analysis of one statement of the input
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    /// 1-based position in the input
    pub index:    usize,
    pub query:    String,
    pub analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<QueryDetails>
}

/// Number of queries per complexity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total:    usize,
    pub simple:   usize,
    pub moderate: usize,
    pub complex:  usize,
    pub unknown:  usize
}

impl Summary {
    pub fn from_reports(reports: &[QueryReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match report.analysis.complexity {
                Complexity::Simple => summary.simple += 1,
                Complexity::Moderate => summary.moderate += 1,
                Complexity::Complex => summary.complex += 1,
                Complexity::Unknown => summary.unknown += 1
            }
        }
        summary
    }
}

#[derive(Serialize)]
struct Report<'a> {
    queries: &'a [QueryReport],
    summary: Summary
}

/// Render all query reports plus the summary
///
/// # Errors
///
/// Returns an error if JSON or YAML serialization fails.
pub fn format_report(reports: &[QueryReport], opts: &OutputOptions) -> AppResult<String> {
    let report = Report {
        queries: reports,
        summary: Summary::from_reports(reports)
    };
    match opts.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).map_err(|e| output_error("JSON", e))
        }
        OutputFormat::Yaml => serde_yaml::to_string(&report).map_err(|e| output_error("YAML", e)),
        OutputFormat::Text => Ok(format_text_report(reports, &report.summary, opts))
    }
}

/// Single-line preview of a query, at most [`PREVIEW_WIDTH`] characters
/// before the ellipsis
pub fn query_preview(query: &str) -> String {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_WIDTH {
        return collapsed;
    }
    let mut preview: String = collapsed.chars().take(PREVIEW_WIDTH).collect();
    preview.push_str("...");
    preview
}

fn complexity_label(complexity: Complexity, colored: bool) -> String {
    let label = complexity.to_string();
    if !colored {
        return label;
    }
    match complexity {
        Complexity::Simple => label.green().to_string(),
        Complexity::Moderate => label.yellow().to_string(),
        Complexity::Complex => label.red().bold().to_string(),
        Complexity::Unknown => label.dimmed().to_string()
    }
}

fn format_text_report(reports: &[QueryReport], summary: &Summary, opts: &OutputOptions) -> String {
    let mut output = String::new();

    for report in reports {
        let analysis = &report.analysis;
        let header = format!(
            "Query #{} ({}): {}",
            report.index,
            analysis.statement_type,
            query_preview(&report.query)
        );
        if opts.colored {
            output.push_str(&header.cyan().bold().to_string());
        } else {
            output.push_str(&header);
        }
        output.push('\n');

        output.push_str(&format!(
            "  Complexity: {}\n",
            complexity_label(analysis.complexity, opts.colored)
        ));
        let tables: Vec<&str> = analysis.tables_involved.iter().map(|s| s.as_str()).collect();
        if tables.is_empty() {
            output.push_str("  Tables: -\n");
        } else {
            output.push_str(&format!("  Tables: {}\n", tables.join(", ")));
        }

        if opts.verbose
            && let Some(details) = &report.features
        {
            output.push_str(&format!("  Score: {}\n", details.features.score));
            for join in &details.features.joins {
                output.push_str(&format!("  Join: {}\n", join));
            }
            let referenced: Vec<&str> =
                details.referenced_tables.iter().map(|s| s.as_str()).collect();
            output.push_str(&format!("  Referenced tables: {}\n", referenced.join(", ")));
        }

        if analysis.suggested_improvements.is_empty() {
            output.push_str("  Suggestions: none\n");
        } else {
            output.push_str("  Suggestions:\n");
            for suggestion in &analysis.suggested_improvements {
                output.push_str(&format!("    - {}\n", suggestion));
            }
        }
        output.push('\n');
    }

    let totals = format!("Queries analyzed: {}", summary.total);
    if opts.colored {
        output.push_str(&totals.bold().to_string());
    } else {
        output.push_str(&totals);
    }
    output.push('\n');
    output.push_str(&format!(
        "  {}: {}  {}: {}  {}: {}  {}: {}",
        complexity_label(Complexity::Simple, opts.colored),
        summary.simple,
        complexity_label(Complexity::Moderate, opts.colored),
        summary.moderate,
        complexity_label(Complexity::Complex, opts.colored),
        summary.complex,
        complexity_label(Complexity::Unknown, opts.colored),
        summary.unknown
    ));
    output
}
