//! Fan-out of per-channel settings over the registers of a channel pair.

use crate::command::ChannelCommands;
use crate::dispatcher::Dispatcher;
use crate::frame::Reply;
use fgen_core::{Channel, FgenError, FgenResult, LineTransport, PerChannel};

impl<T: LineTransport> Dispatcher<T> {
    /// Read a per-channel setting and convert each reply.
    ///
    /// `Both` reads channel 1 then channel 2; `None` performs no I/O.
    pub async fn get_per_channel<V, F>(
        &mut self,
        cmds: ChannelCommands,
        which: Channel,
        args: &[i64],
        convert: F,
    ) -> FgenResult<PerChannel<V>>
    where
        F: Fn(Reply) -> FgenResult<V>,
    {
        match which {
            Channel::Both => {
                let first = convert(self.get(cmds.0, args).await?)?;
                let second = convert(self.get(cmds.1, args).await?)?;
                Ok(PerChannel::Both(first, second))
            }
            Channel::Ch1 | Channel::Ch2 => {
                let cmd = if which == Channel::Ch1 { cmds.0 } else { cmds.1 };
                Ok(PerChannel::One(convert(self.get(cmd, args).await?)?))
            }
            Channel::None => Ok(PerChannel::Empty),
        }
    }

    /// Write a per-channel setting.
    ///
    /// `Both` writes channel 1 then channel 2; `None` performs no I/O.
    pub async fn set_per_channel(
        &mut self,
        cmds: ChannelCommands,
        which: Channel,
        args: &[i64],
    ) -> FgenResult<()> {
        if args.is_empty() {
            return Err(FgenError::invalid_argument(format!(
                "set of {:?}/{:?} without a value",
                cmds.0, cmds.1
            )));
        }
        match which {
            Channel::Both => {
                self.set(cmds.0, args).await?;
                self.set(cmds.1, args).await
            }
            Channel::Ch1 => self.set(cmds.0, args).await,
            Channel::Ch2 => self.set(cmds.1, args).await,
            Channel::None => Ok(()),
        }
    }
}
