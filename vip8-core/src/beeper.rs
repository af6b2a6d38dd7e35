use std::io;

/// Audio collaborator. `tone` fires once each time the sound timer runs out.
pub trait Beeper {
    fn tone(&mut self) -> io::Result<()>;
}

pub struct Silent;

impl Beeper for Silent {
    fn tone(&mut self) -> io::Result<()> {
        Ok(())
    }
}
