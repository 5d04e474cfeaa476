//! Embed builder slash command: /embed-builder

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_embed_builder_command()]
}

fn create_embed_builder_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("embed-builder")
        .description("Interactive embed builder")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_embed_builder_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].0.get("name").unwrap().as_str().unwrap(),
            "embed-builder"
        );
    }
}
