//! # Tag Commands
//!
//! The `/tag` command group: add, view, remove, list, edit.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_tag_command()]
}

fn create_tag_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("tag")
        .description("Guild-scoped stored text snippets")
        .create_option(|option| {
            option
                .name("add")
                .description("Add a tag to the server")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("view")
                .description("View a tag")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("name")
                        .description("The name of the tag")
                        .kind(CommandOptionType::String)
                        .required(true)
                        .max_length(50)
                })
                .create_sub_option(|sub| {
                    sub.name("raw")
                        .description("Display the content without markdown")
                        .kind(CommandOptionType::Boolean)
                        .required(false)
                })
        })
        .create_option(|option| {
            option
                .name("remove")
                .description("Remove a tag from the server")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("name")
                        .description("The name of the tag")
                        .kind(CommandOptionType::String)
                        .required(true)
                        .max_length(50)
                })
        })
        .create_option(|option| {
            option
                .name("list")
                .description("View all tags of the server")
                .kind(CommandOptionType::SubCommand)
        })
        .create_option(|option| {
            option
                .name("edit")
                .description("Edit a tag")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub| {
                    sub.name("name")
                        .description("The name of the tag")
                        .kind(CommandOptionType::String)
                        .required(true)
                        .max_length(50)
                })
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tag_command_with_subcommands() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let tag = &commands[0];
        assert_eq!(tag.0.get("name").unwrap().as_str().unwrap(), "tag");

        let options = tag.0.get("options").unwrap().as_array().unwrap();
        let subcommands: Vec<&str> = options
            .iter()
            .map(|o| o.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(subcommands, vec!["add", "view", "remove", "list", "edit"]);
    }
}
