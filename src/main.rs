use careermatch::application_impl::GuardOutcome;
use careermatch::application_port::*;
use careermatch::client::Client;
use careermatch::domain_model::*;
use careermatch::domain_port::{HttpMethod, HttpRequest};
use careermatch::logger::*;
use careermatch::settings::*;

fn print_state(state: &SessionState) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap("info");

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let client = Client::try_new(&project_settings)?;
    let session = client.session_service.clone();
    let state = session.bootstrap().await;

    match cli.command.unwrap_or(Command::Status) {
        Command::Status => print_state(&state)?,
        Command::Login { username, password } => {
            let landing = client
                .account_service
                .sign_in(LoginInput { username, password })
                .await?;
            println!("signed in, landing on {}", landing);
        }
        Command::GoogleLogin { token } => {
            let landing = client
                .account_service
                .sign_in_with_google(GoogleLoginInput { token })
                .await?;
            println!("signed in, landing on {}", landing);
        }
        Command::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let account = client
                .account_service
                .register(RegisterInput {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                    role: None,
                })
                .await?;
            println!("registered {} ({}), please sign in", account.username, account.role);
        }
        Command::Logout => {
            let target = client.account_service.sign_out();
            println!("signed out, go to {}", target);
        }
        Command::Refresh => print_state(&session.refresh().await)?,
        Command::Request { method, path, body } => {
            let method = method.parse::<HttpMethod>().map_err(anyhow::Error::msg)?;
            let mut request = HttpRequest::new(method, path);
            if let Some(body) = body {
                request.body = Some(serde_json::from_str(&body)?);
            }
            match client.api.call(request).await {
                Ok(response) => println!("{} {}", response.status, response.text()),
                Err(ApiError::Unauthorized) => {
                    println!("not authorized, now at {}", client.navigator.current());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Route { path } => {
            let (route, outcome) = client.visit(&path);
            match outcome {
                GuardOutcome::Loading => println!("{}: loading", route),
                GuardOutcome::Redirect(target) => println!("{}: redirect to {}", route, target),
                GuardOutcome::Render => println!("{}: render", route),
            }
        }
    }

    Ok(())
}
