#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

pub struct ChatCommand {
    command: String,
    pub args: Vec<String>,
}

impl ChatCommand {
    pub fn parse(text: &str) -> Option<ChatCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| {
                return e.to_string();
            })
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = ChatCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_mode()
            || cmd.is_attach()
            || cmd.is_clear_files()
            || cmd.is_upload()
            || cmd.is_new_session()
            || cmd.is_status()
            || cmd.is_cleanup()
            || cmd.is_export()
            || cmd.is_user_set()
            || cmd.is_session_set()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_mode(&self) -> bool {
        return ["/m", "/mode"].contains(&self.command.as_str());
    }

    pub fn is_attach(&self) -> bool {
        return ["/a", "/attach"].contains(&self.command.as_str());
    }

    pub fn is_clear_files(&self) -> bool {
        return ["/cf", "/clear-files"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_new_session(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_status(&self) -> bool {
        return ["/st", "/status"].contains(&self.command.as_str());
    }

    pub fn is_cleanup(&self) -> bool {
        return ["/cl", "/cleanup"].contains(&self.command.as_str());
    }

    pub fn is_export(&self) -> bool {
        return ["/e", "/export"].contains(&self.command.as_str());
    }

    pub fn is_user_set(&self) -> bool {
        return self.command.as_str() == "/user";
    }

    pub fn is_session_set(&self) -> bool {
        return self.command.as_str() == "/session";
    }
}
