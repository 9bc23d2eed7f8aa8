use bytes::Bytes;

/// A single Redis command: its name plus opaque arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<Bytes>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Builder-style argument append
    pub fn arg(mut self, arg: impl Into<Bytes>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build a command from a client argv, where the first element is the name.
    /// Returns `None` for an empty argv.
    pub fn from_argv<I, A>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Bytes>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let name = iter.next()?;
        Some(Command {
            name: String::from_utf8_lossy(&name).into_owned(),
            args: iter.collect(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }
}

/// Commands sent together (pipeline or MULTI block), in send order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBatch {
    commands: Vec<Command>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl FromIterator<Command> for CommandBatch {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        CommandBatch {
            commands: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandBatch {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Whatever the client handed to the connection for one write
#[derive(Debug, Clone, Copy)]
pub enum CommandPayload<'a> {
    Single(&'a Command),
    Batch(&'a CommandBatch),
    /// A payload shape the tracer does not understand
    Unknown,
}

impl<'a> From<&'a Command> for CommandPayload<'a> {
    fn from(command: &'a Command) -> Self {
        CommandPayload::Single(command)
    }
}

impl<'a> From<&'a CommandBatch> for CommandPayload<'a> {
    fn from(batch: &'a CommandBatch) -> Self {
        CommandPayload::Batch(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let cmd = Command::from_argv(["SET", "key", "value"]).unwrap();
        assert_eq!(cmd.name(), "SET");
        assert_eq!(cmd.args(), &[Bytes::from("key"), Bytes::from("value")]);
    }

    #[test]
    fn test_from_empty_argv() {
        assert!(Command::from_argv(Vec::<Bytes>::new()).is_none());
    }

    #[test]
    fn test_batch_keeps_insertion_order() {
        let mut batch = CommandBatch::new();
        batch.push(Command::new("MULTI"));
        batch.push(Command::new("INCR").arg("counter"));
        batch.push(Command::new("EXEC"));

        let names: Vec<&str> = batch.iter().map(Command::name).collect();
        assert_eq!(names, vec!["MULTI", "INCR", "EXEC"]);
        assert_eq!(batch.len(), 3);
    }
}
