use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, BufRead, BufReader, Read, Write};

/// NDJSON 讀取端 - 每行一個訊息
///
/// 解析失敗回傳 `ErrorKind::InvalidData`，該行已被讀掉，可以繼續讀下一行。
pub struct MessageReader<R> {
    reader: BufReader<R>,
    line: String,
}

impl<R: Read> MessageReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            line: String::new(),
        }
    }

    /// 讀取一行並解析，EOF 時回傳 Ok(None)
    pub fn read_message<T: DeserializeOwned>(&mut self) -> io::Result<Option<T>> {
        loop {
            self.line.clear();
            let bytes_read = self.reader.read_line(&mut self.line)?;

            if bytes_read == 0 {
                // EOF - 連線關閉
                return Ok(None);
            }

            let line = self.line.trim();
            if line.is_empty() {
                // 空行，繼續讀取
                continue;
            }

            return match serde_json::from_str(line) {
                Ok(msg) => Ok(Some(msg)),
                Err(e) => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("JSON parse error: {}", e),
                )),
            };
        }
    }
}

/// NDJSON 寫入端 - 每個訊息寫一行並立即 flush
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn send_message<T: Serialize>(&mut self, msg: &T) -> io::Result<()> {
        let json = serde_json::to_string(msg).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("JSON serialize error: {}", e))
        })?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
