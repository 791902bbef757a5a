//! `umbrella paths` command

use anyhow::Result;

use crate::cli::PathsArgs;
use crate::commands::PlanContext;
use umbrella::ops::render_json;
use umbrella::ops::report::PathsReport;
use umbrella::util::config::OutputFormat;

pub fn execute(args: PathsArgs) -> Result<()> {
    let ctx = PlanContext::load(&args.target.plan)?;
    let target = ctx.select(args.target.target.as_deref())?;
    let paths = PathsReport::new(target);

    if ctx.format() == OutputFormat::Json {
        println!("{}", render_json(&paths)?);
        return Ok(());
    }

    println!("Support files for '{}':", target.label());
    println!("  directory:           {}", paths.support_files_dir.display());
    for name in target.user_build_configurations().keys() {
        println!(
            "  xcconfig ({}):{}{}",
            name,
            " ".repeat(10usize.saturating_sub(name.len())),
            target.xcconfig_relative_path(name).display()
        );
    }
    println!("  acknowledgements:    {}", paths.acknowledgements_basepath.display());
    println!("  umbrella header:     {}", paths.umbrella_header.display());
    println!("  module map:          {}", paths.module_map.display());
    println!("  Info.plist:          {}", paths.info_plist.display());
    println!("  dummy source:        {}", paths.dummy_source.display());
    if let Some(ref file) = paths.bridge_support_file {
        println!("  bridge support:      {}", file.display());
    }
    println!();
    println!("Build phase references:");
    println!("  PODS_ROOT:           {}", paths.pods_root);
    println!("  Podfile directory:   {}", paths.podfile_dir);
    println!("  resources script:    {}", paths.copy_resources_script);
    println!("  frameworks script:   {}", paths.embed_frameworks_script);
    println!("  manifest check:      {}", paths.check_manifest_lock_output);

    Ok(())
}
