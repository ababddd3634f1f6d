//! Storage service menus
//!
//! One menu per resource kind on the storage service: storage pools,
//! server endpoints, storage groups, file systems, and file shares
//! (scoped under their parent file system), plus the `quick` menu that
//! chains a full pool→group→filesystem→share stack in one command.

use crate::client::{model, Connection};
use crate::error::Result;
use crate::provision;
use crate::units::parse_byte_size;
use rustyline::DefaultEditor;

use super::{handle_response, probe, require, run_menu, Flow, Menu};

/// Run the storage-service shell against the controller.
pub async fn run(conn: &Connection) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    probe(conn).await;
    run_menu(&mut editor, &MainMenu { conn }).await?;
    Ok(())
}

/// A nested menu finished: its `Back` lands the user in this menu,
/// `Exit` keeps unwinding.
fn resume(flow: Flow) -> Flow {
    match flow {
        Flow::Exit => Flow::Exit,
        _ => Flow::Continue,
    }
}

// =============================================================================
// Main Menu
// =============================================================================

struct MainMenu<'a> {
    conn: &'a Connection,
}

impl Menu for MainMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)".into()
    }

    fn intro(&self) -> &str {
        "Command Interpreter for the NNF Storage Element Controller"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("pool", "Storage Pool commands"),
            ("server", "Server Endpoint commands"),
            ("group", "Storage Group commands"),
            ("fs", "File System commands"),
            ("quick", "Setup and teardown a full stack at once"),
        ]
    }

    async fn dispatch(
        &self,
        editor: &mut DefaultEditor,
        verb: &str,
        _args: &[&str],
    ) -> Result<Flow> {
        let conn = self.conn;
        let flow = match verb {
            "pool" => run_menu(editor, &StoragePoolMenu { conn }).await?,
            "server" => run_menu(editor, &ServerEndpointMenu { conn }).await?,
            "group" => run_menu(editor, &StorageGroupMenu { conn }).await?,
            "fs" => run_menu(editor, &FileSystemMenu { conn }).await?,
            "quick" => run_menu(editor, &QuickMenu { conn }).await?,
            _ => {
                println!("*** Unknown command: {verb}");
                Flow::Continue
            }
        };
        Ok(resume(flow))
    }
}

// =============================================================================
// Storage Pools
// =============================================================================

struct StoragePoolMenu<'a> {
    conn: &'a Connection,
}

impl Menu for StoragePoolMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(storage pool)".into()
    }

    fn intro(&self) -> &str {
        "Create/Get/List/Delete Storage Pools"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("create", "Create a Storage Pool of specific [SIZE = 1GB]"),
            ("put", "Create a Storage Pool of [SIZE] with [POOL ID]"),
            ("get", "Get a Storage Pool by [POOL ID]"),
            ("list", "List Storage Pools"),
            ("delete", "Delete a Storage Pool by [POOL ID]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "create" => {
                let size = match args.first() {
                    Some(size) => size,
                    None => {
                        println!("No size specified - defaulting to 1GB");
                        "1GB"
                    }
                };
                let bytes = parse_byte_size(size)?;
                let response = self.conn.post("/StoragePools", model::storage_pool(bytes)).await?;
                handle_response(&response);
            }
            "put" => {
                require(args, 2, "put [SIZE] [POOL ID]")?;
                let bytes = parse_byte_size(args[0])?;
                let path = format!("/StoragePools/{}", args[1]);
                let response = self.conn.put(&path, model::storage_pool(bytes)).await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [POOL ID]")?;
                let response = self.conn.get(&format!("/StoragePools/{}", args[0])).await?;
                handle_response(&response);
            }
            "list" => {
                let response = self.conn.get("/StoragePools").await?;
                handle_response(&response);
            }
            "delete" => {
                require(args, 1, "delete [POOL ID]")?;
                let response = self.conn.delete(&format!("/StoragePools/{}", args[0])).await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Server Endpoints
// =============================================================================

struct ServerEndpointMenu<'a> {
    conn: &'a Connection,
}

impl Menu for ServerEndpointMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(server endpoints)".into()
    }

    fn intro(&self) -> &str {
        "Get/List Server Endpoints"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("get", "Get a Server Endpoint by [ENDPOINT ID]"),
            ("list", "List Server Endpoints"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "get" => {
                require(args, 1, "get [ENDPOINT ID]")?;
                let response = self.conn.get(&format!("/Endpoints/{}", args[0])).await?;
                handle_response(&response);
            }
            "list" => {
                let response = self.conn.get("/Endpoints").await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Storage Groups
// =============================================================================

struct StorageGroupMenu<'a> {
    conn: &'a Connection,
}

impl Menu for StorageGroupMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(storage group)".into()
    }

    fn intro(&self) -> &str {
        "Create/Get/List/Delete Storage Groups"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                "create",
                "Create a Storage Group from [STORAGE POOL ID] [SERVER ENDPOINT ID]",
            ),
            ("get", "Get a Storage Group by [STORAGE GROUP ID]"),
            ("list", "List Storage Groups"),
            ("delete", "Delete a Storage Group by [STORAGE GROUP ID]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "create" => {
                require(args, 2, "create [STORAGE POOL ID] [SERVER ENDPOINT ID]")?;
                let payload = model::storage_group(&self.conn.base(), args[0], args[1]);
                let response = self.conn.post("/StorageGroups", payload).await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [STORAGE GROUP ID]")?;
                let response = self.conn.get(&format!("/StorageGroups/{}", args[0])).await?;
                handle_response(&response);
            }
            "list" => {
                let response = self.conn.get("/StorageGroups").await?;
                handle_response(&response);
            }
            "delete" => {
                require(args, 1, "delete [STORAGE GROUP ID]")?;
                let response = self.conn.delete(&format!("/StorageGroups/{}", args[0])).await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// File Systems
// =============================================================================

struct FileSystemMenu<'a> {
    conn: &'a Connection,
}

impl Menu for FileSystemMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(file system)".into()
    }

    fn intro(&self) -> &str {
        "Create/Get/List/Delete File Systems"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("create", "Create a File System of [TYPE] [NAME] [STORAGE POOL ID]"),
            ("get", "Get a File System by [FILE SYSTEM ID]"),
            ("list", "List File Systems"),
            ("delete", "Delete a File System by [FILE SYSTEM ID]"),
            ("share", "File Share operations for [FILE SYSTEM ID]"),
        ]
    }

    async fn dispatch(
        &self,
        editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "create" => {
                require(args, 3, "create [TYPE] [NAME] [STORAGE POOL ID]")?;
                let payload = model::file_system(&self.conn.base(), args[0], args[1], args[2]);
                let response = self.conn.post("/FileSystems", payload).await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [FILE SYSTEM ID]")?;
                let response = self.conn.get(&format!("/FileSystems/{}", args[0])).await?;
                handle_response(&response);
            }
            "list" => {
                let response = self.conn.get("/FileSystems").await?;
                handle_response(&response);
            }
            "delete" => {
                require(args, 1, "delete [FILE SYSTEM ID]")?;
                let response = self.conn.delete(&format!("/FileSystems/{}", args[0])).await?;
                handle_response(&response);
            }
            "share" => {
                require(args, 1, "share [FILE SYSTEM ID]")?;
                let menu = FileShareMenu {
                    conn: self.conn,
                    fs: args[0].to_string(),
                };
                return Ok(resume(run_menu(editor, &menu).await?));
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// File Shares
// =============================================================================

struct FileShareMenu<'a> {
    conn: &'a Connection,
    /// Parent file system identifier.
    fs: String,
}

impl FileShareMenu<'_> {
    fn path(&self, share: Option<&str>) -> String {
        match share {
            Some(share) => format!("/FileSystems/{}/ExportedFileShares/{}", self.fs, share),
            None => format!("/FileSystems/{}/ExportedFileShares", self.fs),
        }
    }
}

impl Menu for FileShareMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(file system)(file share)".into()
    }

    fn intro(&self) -> &str {
        "Create/Get/List/Delete File Shares"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (
                "create",
                "Create a File Share to a [SERVER ENDPOINT ID] with [MOUNTPOINT]",
            ),
            ("get", "Get a File Share with [FILE SHARE ID]"),
            ("list", "List File Shares on this File System"),
            ("delete", "Delete a File Share with [FILE SHARE ID]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "create" => {
                require(args, 2, "create [SERVER ENDPOINT ID] [MOUNTPOINT]")?;
                let payload = model::file_share(&self.conn.base(), args[0], args[1]);
                let response = self.conn.post(&self.path(None), payload).await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [FILE SHARE ID]")?;
                let response = self.conn.get(&self.path(Some(args[0]))).await?;
                handle_response(&response);
            }
            "list" => {
                let response = self.conn.get(&self.path(None)).await?;
                handle_response(&response);
            }
            "delete" => {
                require(args, 1, "delete [FILE SHARE ID]")?;
                let response = self.conn.delete(&self.path(Some(args[0]))).await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Quick Menu
// =============================================================================

struct QuickMenu<'a> {
    conn: &'a Connection,
}

impl Menu for QuickMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(quick)".into()
    }

    fn intro(&self) -> &str {
        "Quick commands to do a bunch of things at once on the controller"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("setup", "Quickly setup a file system of type [TYPE]"),
            ("teardown", "Quickly teardown a system"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "setup" => {
                require(args, 1, "setup [TYPE]")?;
                let plan = provision::quick_setup_plan(&self.conn.base(), args[0]);
                for request in &plan {
                    let response = provision::execute(self.conn, request).await?;
                    handle_response(&response);
                }
            }
            "teardown" => {
                for request in &provision::quick_teardown_plan() {
                    let response = provision::execute(self.conn, request).await?;
                    handle_response(&response);
                }
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}
