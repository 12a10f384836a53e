//! Bundled sample gems for demo builds and smoke tests.

use crate::types::GemInput;

/// Five well-known Ruby gems with realistic metadata.
pub fn sample_gems() -> Vec<GemInput> {
    vec![
        GemInput {
            name: "rails".to_string(),
            description: "Ruby on Rails is a web application framework.".to_string(),
            keywords: to_strings(&["web", "framework", "mvc", "activerecord"]),
            version: "7.0.0".to_string(),
            homepage: "https://rubyonrails.org".to_string(),
            source_uri: "https://github.com/rails/rails".to_string(),
            download_count: 500_000_000,
            stars: 55_000,
            last_updated: None,
        },
        GemInput {
            name: "rspec".to_string(),
            description: "Behaviour Driven Development framework for Ruby.".to_string(),
            keywords: to_strings(&["testing", "bdd", "spec", "behavior"]),
            version: "3.12.0".to_string(),
            homepage: "https://rspec.info".to_string(),
            source_uri: "https://github.com/rspec/rspec".to_string(),
            download_count: 300_000_000,
            stars: 12_000,
            last_updated: None,
        },
        GemInput {
            name: "devise".to_string(),
            description: "Flexible authentication solution for Rails applications.".to_string(),
            keywords: to_strings(&["authentication", "rails", "security", "user"]),
            version: "4.9.0".to_string(),
            homepage: "https://github.com/heartcombo/devise".to_string(),
            source_uri: "https://github.com/heartcombo/devise".to_string(),
            download_count: 200_000_000,
            stars: 23_000,
            last_updated: None,
        },
        GemInput {
            name: "sidekiq".to_string(),
            description: "Efficient background processing framework for Ruby.".to_string(),
            keywords: to_strings(&["background", "jobs", "queue", "redis"]),
            version: "7.0.0".to_string(),
            homepage: "https://sidekiq.org".to_string(),
            source_uri: "https://github.com/sidekiq/sidekiq".to_string(),
            download_count: 150_000_000,
            stars: 13_000,
            last_updated: None,
        },
        GemInput {
            name: "pundit".to_string(),
            description: "Minimal authorization through OO design and pure Ruby classes."
                .to_string(),
            keywords: to_strings(&["authorization", "policy", "security", "rbac"]),
            version: "2.3.0".to_string(),
            homepage: "https://github.com/varvet/pundit".to_string(),
            source_uri: "https://github.com/varvet/pundit".to_string(),
            download_count: 100_000_000,
            stars: 8_000,
            last_updated: None,
        },
    ]
}

/// Synthesize a README for a sample gem from its metadata.
pub fn demo_readme(gem: &GemInput) -> String {
    format!(
        "# {name}\n\n\
         {description}\n\n\
         ## Installation\n\n\
         Add this line to your application's Gemfile:\n\n\
         ```ruby\n\
         gem '{name}'\n\
         ```\n\n\
         ## Usage\n\n\
         This gem provides {keywords} functionality for Ruby applications.\n\n\
         ## Features\n\n\
         - High performance\n\
         - Well documented\n\
         - Extensive test coverage\n\
         - Active community support\n\n\
         ## Contributing\n\n\
         Bug reports and pull requests are welcome on GitHub.\n",
        name = gem.name,
        description = gem.description,
        keywords = gem.keywords.join(", "),
    )
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================
