#![allow(missing_docs)]

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use recast::record::{Catalog, FromRecord, MaterializeOptions, Payload, RecordValue, Result};

#[derive(Debug, Clone, PartialEq)]
struct FileInfo {
	name: String,
	path: String,
	size: i64,
	is_dir: bool,
	mod_time: Option<String>,
	children: Option<Vec<FileInfo>>,
}

impl FromRecord for FileInfo {
	const KIND: &'static str = "FileInfo";

	fn from_record(record: &RecordValue) -> Result<Self> {
		Ok(Self {
			name: record.required("name")?,
			path: record.required("path")?,
			size: record.optional("size")?.unwrap_or(0),
			is_dir: record.required("isDir")?,
			mod_time: record.optional("modTime")?,
			children: record.nested_seq("children")?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
struct ExcelSheetInfo {
	name: String,
	visible: bool,
	index: u32,
}

impl FromRecord for ExcelSheetInfo {
	const KIND: &'static str = "ExcelSheetInfo";

	fn from_record(record: &RecordValue) -> Result<Self> {
		Ok(Self {
			name: record.required("name")?,
			visible: record.required("visible")?,
			index: record.required("index")?,
		})
	}
}

#[derive(Debug)]
struct WorkbookSheets {
	file: Option<FileInfo>,
	sheets: Vec<ExcelSheetInfo>,
}

impl FromRecord for WorkbookSheets {
	const KIND: &'static str = "WorkbookSheets";

	fn from_record(record: &RecordValue) -> Result<Self> {
		Ok(Self {
			file: record.nested("file")?,
			sheets: record.nested_seq("sheets")?.unwrap_or_default(),
		})
	}
}

#[derive(Debug)]
struct DirectorySessionCache {
	directory_path: String,
	selected_files: Vec<String>,
	expanded_folders: Vec<String>,
	sheet_selections: HashMap<String, Vec<String>>,
	file_hashes: HashMap<String, String>,
}

impl FromRecord for DirectorySessionCache {
	const KIND: &'static str = "DirectorySessionCache";

	fn from_record(record: &RecordValue) -> Result<Self> {
		Ok(Self {
			directory_path: record.required("directoryPath")?,
			selected_files: record.optional("selectedFiles")?.unwrap_or_default(),
			expanded_folders: record.optional("expandedFolders")?.unwrap_or_default(),
			sheet_selections: record.optional("sheetSelections")?.unwrap_or_default(),
			file_hashes: record.optional("fileHashes")?.unwrap_or_default(),
		})
	}
}

#[derive(Debug)]
struct Workspace {
	tree: Vec<FileInfo>,
	workbooks: BTreeMap<String, WorkbookSheets>,
	history_paths: Vec<String>,
	session: Option<DirectorySessionCache>,
	progress: Option<u8>,
}

impl FromRecord for Workspace {
	const KIND: &'static str = "Workspace";

	fn from_record(record: &RecordValue) -> Result<Self> {
		let history = record.get("history").and_then(|value| value.as_sequence()).unwrap_or_default();
		let mut history_paths = Vec::with_capacity(history.len());
		for item in history {
			if let Some(entry) = item.as_record() {
				history_paths.push(entry.required("path")?);
			}
		}

		let status = record.get("status").and_then(|value| value.as_record());
		let progress = match status {
			Some(status) => status.optional("progress")?,
			None => None,
		};

		Ok(Self {
			tree: record.nested_seq("tree")?.unwrap_or_default(),
			workbooks: record.nested_map("workbooks")?.unwrap_or_default(),
			history_paths,
			session: record.nested("session")?,
			progress,
		})
	}
}

#[test]
fn file_tree_fixture_converts_to_typed_tree() {
	let catalog = Catalog::open(fixture_path("schema.json")).expect("schema opens");
	let payload = Payload::open(fixture_path("tree.json")).expect("payload opens");

	let root: FileInfo = catalog.materialize_as(&payload.value, &MaterializeOptions::default()).expect("typed tree");

	assert_eq!(root.name, "reports");
	assert!(root.is_dir);
	assert_eq!(typed_depth(&root), 5);

	let children = root.children.as_ref().expect("root has children");
	assert_eq!(children.len(), 3);
	assert_eq!(children[0].size, 20480);
	assert_eq!(children[0].children, None, "files carry no children");
	assert_eq!(children[2].name, "empty");
	assert_eq!(children[2].children, None, "null children are absent, not empty");

	let archive = &children[1].children.as_ref().expect("2024 children")[1].children.as_ref().expect("q1 children")[1];
	assert_eq!(archive.path, "/data/reports/2024/q1/archive");
	assert_eq!(archive.mod_time.as_deref(), Some("2024-01-31 12:00:00"));
}

#[test]
fn workspace_fixture_converts_nested_kinds() {
	let catalog = Catalog::open(fixture_path("schema.json")).expect("schema opens");
	let payload = Payload::open(fixture_path("workspace.json")).expect("payload opens");

	let workspace: Workspace = catalog.materialize_as(&payload.value, &MaterializeOptions::default()).expect("typed workspace");

	assert_eq!(workspace.tree.len(), 1);
	assert_eq!(workspace.workbooks.len(), 2);

	let budget = workspace.workbooks.get("/data/budget.xlsx").expect("budget workbook");
	assert_eq!(budget.file.as_ref().map(|file| file.name.as_str()), Some("budget.xlsx"));
	assert_eq!(budget.sheets.iter().map(|sheet| sheet.index).collect::<Vec<_>>(), [0, 1]);
	assert!(workspace.workbooks["/data/forecast.xlsm"].sheets.is_empty());

	assert_eq!(workspace.history_paths, ["/data", "/archive"]);
	assert_eq!(workspace.progress, Some(100));

	let session = workspace.session.expect("session present");
	assert_eq!(session.directory_path, "/data");
	assert_eq!(session.selected_files, ["/data/budget.xlsx"]);
	assert!(session.expanded_folders.is_empty());
	assert_eq!(session.sheet_selections["/data/budget.xlsx"], ["Summary"]);
	assert_eq!(session.file_hashes.len(), 1);
}

#[test]
fn untrusted_budget_still_admits_fixture_tree() {
	let catalog = Catalog::open(fixture_path("schema.json")).expect("schema opens");
	let payload = Payload::open(fixture_path("tree.json")).expect("payload opens");

	let root: FileInfo = catalog.materialize_as(&payload.value, &MaterializeOptions::for_untrusted()).expect("typed tree");
	assert_eq!(typed_depth(&root), 5);
}

fn typed_depth(file: &FileInfo) -> usize {
	1 + file
		.children
		.as_ref()
		.map(|items| items.iter().map(typed_depth).max().unwrap_or(0))
		.unwrap_or(0)
}

fn fixture_path(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}
