use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("consulta")
        .about("Credential-gated customer record lookup")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("CONSULTA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("secrets")
                .short('s')
                .long("secrets")
                .help("Secrets file with the [auth] table (CONSULTA_SECRETS overrides it)")
                .default_value("secrets.toml")
                .env("CONSULTA_SECRETS_FILE")
                .global(true),
        )
        .arg(
            Arg::new("dataset")
                .short('d')
                .long("dataset")
                .help("Customer dataset file")
                .default_value("clientes.csv")
                .env("CONSULTA_DATASET"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("CONSULTA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("hash")
                .about("Regenerate password hashes and the signing key in the secrets file"),
        )
        .subcommand(
            Command::new("verify")
                .about("Check one username/password pair against the secrets file")
                .arg(Arg::new("username").help("Username to test").required(true)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "consulta");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Credential-gated customer record lookup"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        let command = new();
        let matches = command.get_matches_from(vec!["consulta"]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<String>("secrets").map(String::as_str),
            Some("secrets.toml")
        );
        assert_eq!(
            matches.get_one::<String>("dataset").map(String::as_str),
            Some("clientes.csv")
        );
    }

    #[test]
    fn test_check_port_and_paths() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "consulta",
            "--port",
            "9090",
            "--secrets",
            "conf/secrets.toml",
            "--dataset",
            "data/clientes.csv",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
        assert_eq!(
            matches.get_one::<String>("secrets").map(String::as_str),
            Some("conf/secrets.toml")
        );
        assert_eq!(
            matches.get_one::<String>("dataset").map(String::as_str),
            Some("data/clientes.csv")
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("CONSULTA_PORT", Some("443")),
                ("CONSULTA_SECRETS_FILE", Some("env-secrets.toml")),
                ("CONSULTA_DATASET", Some("env.csv")),
                ("CONSULTA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["consulta"]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("secrets").map(String::as_str),
                    Some("env-secrets.toml")
                );
                assert_eq!(
                    matches.get_one::<String>("dataset").map(String::as_str),
                    Some("env.csv")
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("CONSULTA_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["consulta"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("CONSULTA_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["consulta".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_subcommands() {
        let command = new();
        let matches = command.get_matches_from(vec!["consulta", "verify", "joao"]);

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "verify");
        assert_eq!(
            sub.get_one::<String>("username").map(String::as_str),
            Some("joao")
        );

        let matches = new().get_matches_from(vec!["consulta", "hash", "--secrets", "s.toml"]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "hash");
        assert_eq!(
            sub.get_one::<String>("secrets").map(String::as_str),
            Some("s.toml")
        );
    }
}
