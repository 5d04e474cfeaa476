//! Games slash commands: /trivia

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_trivia_command()]
}

fn create_trivia_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("trivia")
        .description("Play a trivia round")
        .create_option(|option| {
            option
                .name("questions")
                .description("Number of questions (default: 5)")
                .kind(CommandOptionType::Integer)
                .required(false)
                .min_int_value(1)
                .max_int_value(10)
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trivia_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].0.get("name").unwrap().as_str().unwrap(),
            "trivia"
        );
    }
}
