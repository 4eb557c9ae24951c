use crate::{
    cli::CliArgs,
    config::{CodecConfig, Config, SlimProfile},
    utils::Result,
};
use std::path::Path;

/// Runs the informational commands. Returns `true` when one was handled and
/// the program should exit without slimming anything.
pub async fn handle_commands(args: &CliArgs, config: &Config) -> Result<bool> {
    if args.list_profiles {
        list_profiles(config).await?;
        return Ok(true);
    }

    if let Some(profile_name) = &args.show_profile {
        show_profile(config, profile_name).await?;
        return Ok(true);
    }

    if args.validate_config {
        validate_config(args.config.as_deref()).await?;
        return Ok(true);
    }

    Ok(false)
}

async fn list_profiles(config: &Config) -> Result<()> {
    let manager = config.profile_manager();

    println!("Available slimming profiles:");
    println!("{:-<80}", "");
    println!("{:<20} {:<45} {:<12}", "Name", "Title", "Languages");
    println!("{:-<80}", "");

    for profile in manager.list_profiles() {
        let selection = profile.resolve(&config.selection);
        println!(
            "{:<20} {:<45} {:<12}",
            profile.name,
            truncate(&profile.title, 45),
            selection.languages.join(",")
        );
    }

    println!("{:-<80}", "");
    println!("Use --show-profile <NAME> to see the settings a profile resolves to.");

    Ok(())
}

/// Fails for unknown names; the error lists the available profiles.
async fn show_profile(config: &Config, name: &str) -> Result<()> {
    let manager = config.profile_manager();
    print_profile(config, manager.get_profile(name)?);
    Ok(())
}

fn print_profile(config: &Config, profile: &SlimProfile) {
    let selection = profile.resolve(&config.selection);

    println!("Profile Details: {}", profile.name);
    println!("{:=<60}", "");
    println!("Title: {}", profile.title);
    println!();

    println!("Stream Selection:");
    println!("{:-<40}", "");
    println!("  Languages: {}", or_none(&selection.languages));
    println!("  Keep untagged tracks: {}", selection.no_language);
    println!("  Keep non-default audio: {}", selection.include_other_audio);
    if selection.keep_subtitle_codecs.is_empty() {
        println!("  Subtitle codecs kept: All");
    } else {
        println!(
            "  Subtitle codecs kept: {}",
            selection.keep_subtitle_codecs.join(", ")
        );
    }
    println!();

    print_codecs("Video", &selection.video);
    print_codecs("Audio", &selection.audio);

    println!("Subtitle Codecs:");
    println!("{:-<40}", "");
    println!("  Preferred: {}", or_none(&selection.subtitle_codecs));
    println!("  Always copied");
}

fn print_codecs(kind: &str, codecs: &CodecConfig) {
    println!("{} Codecs:", kind);
    println!("{:-<40}", "");
    println!("  Preferred: {}", or_none(&codecs.preferred));
    if codecs.transcode.is_empty() {
        println!("  Transcode to: (copy)");
    } else {
        println!("  Transcode to: {}", codecs.transcode);
    }
    if !codecs.options.is_empty() {
        println!("  Options: {}", codecs.options.join(" "));
    }
    println!();
}

async fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let loaded = Config::load_with_fallback(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match loaded {
        Ok(config) => {
            match Config::locate(config_path) {
                Some(path) => println!("✓ Configuration file is valid: {}", path.display()),
                None => println!("✓ No configuration file found, built-in defaults are valid"),
            }
            println!();

            println!("Configuration Summary:");
            println!("{:-<40}", "");
            println!("ffmpeg: {}", config.tools.ffmpeg);
            println!("ffprobe: {}", config.tools.ffprobe);
            println!("Languages: {}", or_none(&config.selection.languages));
            println!("Profiles defined: {}", config.profiles.len());
            println!(
                "Profiles available: {}",
                config.profile_manager().list_profile_names().join(", ")
            );

            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration validation failed: {}", e);
            println!();
            println!("Common issues:");
            println!("  - Check YAML syntax and indentation");
            println!("  - Check profile keys for typos (unknown keys are rejected)");
            println!("  - logging.level must be one of trace, debug, info, warn, error");
            Err(e)
        }
    }
}

fn or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
