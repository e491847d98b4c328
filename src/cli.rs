use std::path::PathBuf;

/// Run options gathered from the command line. `None` fields fall back to
/// the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub past: Option<(u32, String)>,
    pub future: Option<(u32, String)>,
    pub output: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub report: bool,
    pub no_color: bool,
    pub clean: bool,
}

pub const USAGE: &str =
    "Usage: calexport [--past N UNIT] [--future N UNIT] [--output PATH] [--store PATH] [--report] [--no-color] [--clean]";

pub fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--past" => {
                options.past = Some(parse_amount_unit("--past", &mut args)?);
            }
            "--future" => {
                options.future = Some(parse_amount_unit("--future", &mut args)?);
            }
            "--output" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--output requires a path".to_string())?;
                options.output = Some(PathBuf::from(path));
            }
            "--store" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--store requires a path".to_string())?;
                options.store = Some(PathBuf::from(path));
            }
            "--report" => {
                options.report = true;
            }
            "--no-color" => {
                options.no_color = true;
            }
            "--clean" => {
                options.clean = true;
            }
            "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(options)
}

fn parse_amount_unit<I>(flag: &str, args: &mut I) -> Result<(u32, String), String>
where
    I: Iterator<Item = String>,
{
    let amount = args
        .next()
        .ok_or_else(|| format!("{} requires an amount and a unit", flag))?;
    let unit = args
        .next()
        .ok_or_else(|| format!("{} requires a unit after the amount", flag))?;

    let amount: u32 = amount
        .parse()
        .map_err(|_| format!("Invalid amount '{}' for {}", amount, flag))?;

    Ok((amount, unit))
}
