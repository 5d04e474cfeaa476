//! Festive slash commands: /card christmas

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_card_command()]
}

fn create_card_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("card")
        .description("Send festive cards to users in the server!")
        .create_option(|option| {
            option
                .name("christmas")
                .description("Send a Christmas card!")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("user")
                        .description("The user to send the card to")
                        .kind(CommandOptionType::User)
                        .required(true)
                })
                .create_sub_option(|sub| {
                    sub.name("color")
                        .description("The color of the card (default: Blue)")
                        .kind(CommandOptionType::String)
                        .required(false)
                        .add_string_choice("Blue", "Blue")
                        .add_string_choice("Green", "Green")
                        .add_string_choice("Purple", "Purple")
                        .add_string_choice("Red", "Red")
                })
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_card_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let card = &commands[0];
        assert_eq!(card.0.get("name").unwrap().as_str().unwrap(), "card");

        let options = card.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options[0].get("name").unwrap().as_str().unwrap(), "christmas");
    }
}
