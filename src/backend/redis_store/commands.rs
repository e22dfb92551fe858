use std::time::Duration;

pub enum Command {
    Delete {
        key: String,
    },
    Get {
        key: String,
    },
    Set {
        key: String,
        value: Vec<u8>,
        ttl: Duration,
    },
}

impl Command {
    pub fn delete(key: String) -> Self {
        Self::Delete { key }
    }
    pub fn get(key: String) -> Self {
        Self::Get { key }
    }
    pub fn set(key: String, value: Vec<u8>, ttl: Duration) -> Self {
        Self::Set { key, value, ttl }
    }
}

impl From<Command> for redis::Cmd {
    fn from(command: Command) -> Self {
        match command {
            Command::Delete { key } => redis::cmd("DEL").arg(&key).clone(),
            Command::Get { key } => redis::cmd("GET").arg(&key).clone(),
            Command::Set { key, value, ttl } => {
                let mut cmd = redis::cmd("SET");
                cmd.arg(&key).arg(value);
                if ttl.as_secs() > 0 {
                    cmd.arg("EX").arg(ttl.as_secs());
                }
                cmd
            }
        }
    }
}
