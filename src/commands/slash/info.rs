//! Info slash commands: /ping

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_ping_command()]
}

fn create_ping_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ping")
        .description("Returns the latency of the bot")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ping_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let name = commands[0].0.get("name").unwrap().as_str().unwrap();
        assert_eq!(name, "ping");
    }
}
