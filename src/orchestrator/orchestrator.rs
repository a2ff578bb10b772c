use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use csv::{ReaderBuilder, Writer};
use log::{info, warn};

use crate::accounts::{Address, CallPrimitive, ValueTransfer};
use crate::engine::MultiSigWallet;
use crate::transactions::{CallRecord, CallType};

/// Wallet configuration taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub owners: Vec<Address>,
    pub required_confirmations: usize,
    pub calls_path: PathBuf,
}

impl VaultConfig {
    /// Parses `<owner,owner,...> <required-confirmations> <calls.csv>`.
    pub fn from_args(args: &[String]) -> Result<Self, Box<dyn Error>> {
        let [owners, required, path] = args else {
            return Err(format!("expected 3 arguments, got {}", args.len()).into());
        };
        let owners = owners
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Address>, _>>()?;
        Ok(Self {
            owners,
            required_confirmations: required.trim().parse()?,
            calls_path: PathBuf::from(path),
        })
    }
}

/// Counts of script rows the wallet accepted and rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

pub fn run(config: &VaultConfig) -> Result<(), Box<dyn Error>> {
    let mut wallet = MultiSigWallet::new(config.owners.clone(), config.required_confirmations)?;
    let mut transfer = ValueTransfer::new();

    let file = File::open(&config.calls_path)?;
    let summary = replay(&mut wallet, &mut transfer, file)?;
    info!(
        "replayed {} calls ({} rejected), wallet balance {}",
        summary.applied + summary.rejected,
        summary.rejected,
        wallet.balance()
    );

    write_ledger(&wallet, io::stdout())
}

/// Apply every script row to `wallet` in order.
///
/// Rejected calls are logged and skipped; a malformed row stops the replay.
pub fn replay<R, C>(wallet: &mut MultiSigWallet, call: &mut C, reader: R) -> Result<ReplaySummary, Box<dyn Error>>
where
    R: io::Read,
    C: CallPrimitive,
{
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut summary = ReplaySummary::default();

    for result in rdr.deserialize() {
        let record: CallRecord = result?;
        let outcome = match record.call_type {
            CallType::Deposit => wallet
                .receive(record.caller, record.require_amount()?)
                .map(|_| ()),
            CallType::Submit => wallet
                .submit(
                    record.caller,
                    record.require_to()?,
                    record.amount.unwrap_or(0),
                    record.data.clone(),
                )
                .map(|_| ()),
            CallType::Confirm => wallet.confirm(record.caller, record.require_tx()?),
            CallType::Revoke => wallet.revoke(record.caller, record.require_tx()?),
            CallType::Execute => wallet.execute(record.caller, record.require_tx()?, call),
        };

        match outcome {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                warn!("{:?} from {} rejected: {}", record.call_type, record.caller, e.reason());
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

/// Write the ledger as CSV: `tx,to,value,data,executed,confirmations`.
pub fn write_ledger<W: io::Write>(wallet: &MultiSigWallet, writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    if wallet.transaction_count() == 0 {
        wtr.write_record(["tx", "to", "value", "data", "executed", "confirmations"])?;
    }
    for view in wallet.transactions() {
        wtr.serialize(view)?;
    }
    wtr.flush()?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "\
type,caller,tx,to,amount,data
deposit,0x9,,,10,
submit,0xa,,0xd,5,0x00
confirm,0xa,0,,,
execute,0xa,0,,,
confirm,0x3,0,,,
confirm,0xb,0,,,
execute,0xc,0,,,
execute,0xa,0,,,
submit,0xb,,0xe,0,
confirm,0xb,1,,,
revoke,0xb,1,,,
revoke,0xb,1,,,
";

    fn wallet() -> MultiSigWallet {
        MultiSigWallet::new(vec![Address::from(0xa), Address::from(0xb), Address::from(0xc)], 2).unwrap()
    }

    #[test]
    fn test_replay_script() {
        let mut wallet = wallet();
        let mut transfer = ValueTransfer::new();
        let summary = replay(&mut wallet, &mut transfer, SCRIPT.as_bytes()).unwrap();

        // Rejected: early execute, outsider confirm, repeat execute, double revoke.
        assert_eq!(summary, ReplaySummary { applied: 8, rejected: 4 });
        assert_eq!(wallet.balance(), 5);
        assert_eq!(transfer.balance_of(&Address::from(0xd)), 5);
        assert!(wallet.transaction(0).unwrap().executed);
        assert_eq!(wallet.transaction(1).unwrap().num_confirmations, 0);
    }

    #[test]
    fn test_missing_column_aborts() {
        let mut wallet = wallet();
        let script = "type,caller,tx,to,amount,data\nconfirm,0xa,,,,\n";
        let err = replay(&mut wallet, &mut ValueTransfer::new(), script.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`tx`"));
    }

    #[test]
    fn test_malformed_row_aborts() {
        let mut wallet = wallet();
        let script = "type,caller,tx,to,amount,data\nwithdraw,0xa,0,,,\n";
        assert!(replay(&mut wallet, &mut ValueTransfer::new(), script.as_bytes()).is_err());
    }

    #[test]
    fn test_write_ledger() {
        let mut wallet = wallet();
        replay(&mut wallet, &mut ValueTransfer::new(), SCRIPT.as_bytes()).unwrap();

        let mut out = Vec::new();
        write_ledger(&wallet, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tx,to,value,data,executed,confirmations");
        assert_eq!(
            lines[1],
            "0,0x000000000000000000000000000000000000000d,5,0x00,true,2"
        );
        assert_eq!(
            lines[2],
            "1,0x000000000000000000000000000000000000000e,0,0x,false,0"
        );
    }

    #[test]
    fn test_write_empty_ledger_has_header() {
        let mut out = Vec::new();
        write_ledger(&wallet(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "tx,to,value,data,executed,confirmations\n");
    }

    #[test]
    fn test_config_from_args() {
        let args: Vec<String> = ["0x1,0x2, 0x3", "2", "calls.csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = VaultConfig::from_args(&args).unwrap();
        assert_eq!(
            config.owners,
            vec![Address::from(1), Address::from(2), Address::from(3)]
        );
        assert_eq!(config.required_confirmations, 2);
        assert_eq!(config.calls_path, PathBuf::from("calls.csv"));

        let bad = vec!["0x1".to_string(), "two".to_string(), "calls.csv".to_string()];
        assert!(VaultConfig::from_args(&bad).is_err());
        assert!(VaultConfig::from_args(&args[..2]).is_err());
    }
}
